use oscine_shared::{Argument, Bundle, DecodeError, Message, Packet, Timetag};

// ============================================================================
// Message encoding
// ============================================================================

#[test]
fn test_empty_message_has_canonical_encoding() {
    let message = Message::new("/a/b/c");

    // address padded to 8 bytes, type tag string padded to 4
    assert_eq!(message.encode(), b"/a/b/c\0\0,\0\0\0");
}

#[test]
fn test_message_round_trip_every_argument_type() {
    let mut message = Message::new("/mixer/channel/3");
    message.push(Argument::Nil);
    message.push(true);
    message.push(false);
    message.push(0x7fff_0001_i32);
    message.push(-1_i64);
    message.push(1.5_f32);
    message.push(-0.25_f64);
    message.push("label with spaces");
    message.push(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
    message.push(Timetag::from_raw(0x_0102_0304_0506_0708));

    let bytes = message.encode();
    assert_eq!(bytes.len() % 4, 0);

    let decoded = match Packet::decode(&bytes) {
        Ok(Some(Packet::Message(decoded))) => decoded,
        other => panic!("expected a message, got {other:?}"),
    };
    assert_eq!(decoded, message);
}

#[test]
fn test_message_with_no_arguments_round_trips() {
    let message = Message::new("/ping");
    let decoded = Packet::decode(&message.encode()).unwrap().unwrap();
    assert_eq!(decoded, Packet::Message(message));
}

// ============================================================================
// Bundle encoding
// ============================================================================

#[test]
fn test_bundle_round_trip_preserves_timetag_and_children() {
    let mut inner = Bundle::new(Timetag::from_raw(0x_dead_beef_0000_0001));
    let mut inner_msg = Message::new("/inner");
    inner_msg.push(7_i32);
    inner.push_message(inner_msg);

    let mut outer = Bundle::new(Timetag::IMMEDIATE);
    let mut first = Message::new("/first");
    first.push("one");
    let mut second = Message::new("/second");
    second.push(2_i32);
    outer.push_message(first);
    outer.push_message(second);
    outer.push_bundle(inner);

    let bytes = outer.encode();
    assert_eq!(&bytes[..8], b"#bundle\0");

    let decoded = match Packet::decode(&bytes) {
        Ok(Some(Packet::Bundle(decoded))) => decoded,
        other => panic!("expected a bundle, got {other:?}"),
    };
    assert_eq!(decoded.timetag, Timetag::IMMEDIATE);
    assert_eq!(decoded.messages.len(), 2);
    assert_eq!(decoded.messages[0].address, "/first");
    assert_eq!(decoded.messages[1].address, "/second");
    assert_eq!(decoded.bundles.len(), 1);
    assert_eq!(decoded, outer);
}

#[test]
fn test_deeply_nested_bundle_is_rejected() {
    let mut bundle = Bundle::new(Timetag::IMMEDIATE);
    for _ in 0..40 {
        let mut outer = Bundle::new(Timetag::IMMEDIATE);
        outer.push_bundle(bundle);
        bundle = outer;
    }

    match Packet::decode(&bundle.encode()) {
        Err(DecodeError::BundleTooDeep { .. }) => {}
        other => panic!("expected BundleTooDeep, got {other:?}"),
    }
}

#[test]
fn test_bundle_with_wrong_tag_is_rejected() {
    let mut bytes = Bundle::new(Timetag::IMMEDIATE).encode();
    bytes[1] = b'x';

    match Packet::decode(&bytes) {
        Err(DecodeError::InvalidBundleTag { found }) => assert_eq!(found, "#xundle"),
        other => panic!("expected InvalidBundleTag, got {other:?}"),
    }
}

#[test]
fn test_bundle_element_length_past_datagram_end_is_rejected() {
    let mut bundle = Bundle::new(Timetag::IMMEDIATE);
    bundle.push_message(Message::new("/x"));
    let mut bytes = bundle.encode();

    // corrupt the element length prefix (bytes 16..20) to overrun
    bytes[16..20].copy_from_slice(&0xffff_u32.to_be_bytes());

    match Packet::decode(&bytes) {
        Err(DecodeError::MalformedLength { declared, .. }) => assert_eq!(declared, 0xffff),
        other => panic!("expected MalformedLength, got {other:?}"),
    }
}

// ============================================================================
// Top-level sniffing
// ============================================================================

#[test]
fn test_unknown_leading_byte_is_not_a_packet() {
    assert_eq!(Packet::decode(b"GET / HTTP/1.1\r\n"), Ok(None));
    assert_eq!(Packet::decode(b""), Ok(None));
}

#[test]
fn test_source_address_is_metadata_only() {
    let mut packet = Packet::Message(Message::new("/a"));
    assert_eq!(packet.source(), None);

    let peer = "192.0.2.1:53000".parse().unwrap();
    packet.set_source(peer);
    assert_eq!(packet.source(), Some(peer));

    // the source never reaches the wire
    assert_eq!(packet.encode(), Message::new("/a").encode());
}

// ============================================================================
// Malformed argument payloads
// ============================================================================

#[test]
fn test_type_tag_string_must_start_with_comma() {
    let mut bytes = Vec::new();
    oscine_shared::write_padded_string(&mut bytes, "/a");
    oscine_shared::write_padded_string(&mut bytes, "is");

    match Packet::decode(&bytes) {
        Err(DecodeError::InvalidTypeTagString) => {}
        other => panic!("expected InvalidTypeTagString, got {other:?}"),
    }
}

#[test]
fn test_unknown_type_tag_is_rejected() {
    let mut bytes = Vec::new();
    oscine_shared::write_padded_string(&mut bytes, "/a");
    oscine_shared::write_padded_string(&mut bytes, ",q");

    match Packet::decode(&bytes) {
        Err(DecodeError::UnsupportedTypeTag { tag }) => assert_eq!(tag, 'q'),
        other => panic!("expected UnsupportedTypeTag, got {other:?}"),
    }
}

#[test]
fn test_truncated_argument_payload_is_rejected() {
    let mut bytes = Vec::new();
    oscine_shared::write_padded_string(&mut bytes, "/a");
    oscine_shared::write_padded_string(&mut bytes, ",i");
    bytes.extend_from_slice(&[0, 0]); // int32 cut short

    match Packet::decode(&bytes) {
        Err(DecodeError::TruncatedInput { .. }) => {}
        other => panic!("expected TruncatedInput, got {other:?}"),
    }
}

#[test]
fn test_blob_argument_with_oversized_length_is_rejected() {
    let mut bytes = Vec::new();
    oscine_shared::write_padded_string(&mut bytes, "/a");
    oscine_shared::write_padded_string(&mut bytes, ",b");
    bytes.extend_from_slice(&0x_1000_0000_u32.to_be_bytes()); // 256 MiB claimed

    match Packet::decode(&bytes) {
        Err(DecodeError::MalformedLength { declared, remaining }) => {
            assert_eq!(declared, 0x_1000_0000);
            assert_eq!(remaining, 0);
        }
        other => panic!("expected MalformedLength, got {other:?}"),
    }
}
