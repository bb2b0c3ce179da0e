//! Integration tests for the hd6224-core serial protocol.
//!
//! These tests drive the public API the way the bridge does: commands are
//! encoded for every input the host can pick, and inbound chunks of status
//! text are decoded exactly as they arrive from a serial read loop.

use hd6224_core::{
    protocol::{COMMAND_TERMINATOR, LINE_DELIMITER, SELECT_INPUT_PREFIX},
    InputDescriptor, InputId, KvmCommand, LineDecoder,
};

#[test]
fn test_command_for_each_slot_matches_wire_literal() {
    let expected = ["//m1\r\n", "//m2\r\n", "//m3\r\n", "//m4\r\n"];
    let labels = ["A", "B", "C", "D"];

    for (slot, wire) in InputDescriptor::slots(&labels).iter().zip(expected) {
        assert_eq!(KvmCommand::SelectInput(slot.id).encode(), wire);
    }
}

#[test]
fn test_command_is_prefix_digits_terminator() {
    let encoded = KvmCommand::SelectInput(InputId::new(4)).encode();
    assert!(encoded.starts_with(SELECT_INPUT_PREFIX));
    assert!(encoded.ends_with(COMMAND_TERMINATOR));
    assert_eq!(
        &encoded[SELECT_INPUT_PREFIX.len()..encoded.len() - COMMAND_TERMINATOR.len()],
        "4"
    );
}

#[test]
fn test_parsed_host_value_flows_into_command_unchanged() {
    let id: InputId = "9".parse().expect("numeric");
    assert_eq!(KvmCommand::SelectInput(id).encode(), "//m9\r\n");
}

#[test]
fn test_decoder_handles_byte_at_a_time_delivery() {
    // Arrange: a serial read loop with a tiny buffer delivers one byte per read.
    let stream = b"Current KM Control: 2\rCurrent KM Control: 3\r";
    let mut decoder = LineDecoder::new();
    let mut lines = Vec::new();

    // Act
    for byte in stream {
        lines.extend(decoder.push(std::slice::from_ref(byte)));
    }

    // Assert
    assert_eq!(
        lines,
        vec![
            "Current KM Control: 2".to_string(),
            "Current KM Control: 3".to_string()
        ]
    );
    assert_eq!(decoder.pending_len(), 0);
}

#[test]
fn test_decoded_lines_never_contain_delimiter() {
    let mut decoder = LineDecoder::new();
    let lines = decoder.push(b"x\ry\r\rz\r");
    for line in &lines {
        assert!(!line.as_bytes().contains(&LINE_DELIMITER));
    }
    assert_eq!(lines.len(), 4);
}
