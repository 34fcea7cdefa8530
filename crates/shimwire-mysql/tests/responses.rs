use std::thread;

use shimwire_mysql::protocol::capabilities::{
    CLIENT_DEPRECATE_EOF, CLIENT_PROTOCOL_41, CLIENT_TRANSACTIONS,
};
use shimwire_mysql::protocol::{EOF_MARKER, PacketReader, split_packets};
use shimwire_mysql::{CapabilityInfo, CustomResponse, EncoderConfig, LengthOverflow};

const MODERN_FLAGS: u32 = CLIENT_PROTOCOL_41 | CLIENT_TRANSACTIONS | CLIENT_DEPRECATE_EOF;
const LEGACY_FLAGS: u32 = CLIENT_PROTOCOL_41 | CLIENT_TRANSACTIONS;

fn modern() -> CapabilityInfo {
    CapabilityInfo::new(10, MODERN_FLAGS, MODERN_FLAGS)
}

fn legacy_client() -> CapabilityInfo {
    CapabilityInfo::new(10, LEGACY_FLAGS, MODERN_FLAGS)
}

/// Decode a synthesized key/value result set the way a client would.
fn decode_rows(bytes: &[u8], caps: &CapabilityInfo) -> (Vec<String>, Vec<(String, String)>) {
    let packets = split_packets(bytes).expect("well-formed packets");
    for (i, packet) in packets.iter().enumerate() {
        assert_eq!(usize::from(packet.sequence_id), i + 1, "sequence ids are 1..N");
    }

    let mut iter = packets.iter();
    let count = iter.next().expect("column count");
    assert_eq!(count.payload, vec![2]);

    let columns: Vec<String> = (0..2)
        .map(|_| {
            let def = iter.next().expect("column definition");
            PacketReader::new(&def.payload)
                .parse_column_definition()
                .expect("column definition parses")
                .name
        })
        .collect();

    if !caps.supports_deprecate_eof() {
        let eof = iter.next().expect("metadata EOF");
        assert_eq!(eof.payload.len(), 7);
        let parsed = PacketReader::new(&eof.payload).parse_eof_packet().unwrap();
        assert_eq!(parsed.warnings, 0);
        assert_eq!(parsed.status_flags, 0x0022);
    }

    let remaining: Vec<_> = iter.collect();
    let (terminator, row_packets) = remaining.split_last().expect("terminator");
    assert_eq!(terminator.payload[0], EOF_MARKER);
    let parsed = PacketReader::new(&terminator.payload)
        .parse_eof_packet()
        .expect("terminator parses as EOF");
    assert_eq!(parsed.status_flags, 0x0022);
    let expected_len = if caps.supports_deprecate_eof() { 5 } else { 7 };
    assert_eq!(terminator.payload.len(), expected_len);

    let rows = row_packets
        .iter()
        .map(|packet| {
            let mut reader = PacketReader::new(&packet.payload);
            let key = reader.read_lenenc_string().expect("key");
            let value = reader.read_lenenc_string().expect("value");
            assert!(reader.is_empty());
            (key, value)
        })
        .collect();

    (columns, rows)
}

#[test]
fn rows_decode_back_in_order_for_both_terminator_styles() {
    let long = "x".repeat(251);
    let longer = "y".repeat(4000);
    let input = vec![
        ("zeta".to_string(), "last alphabetically, first in order".to_string()),
        ("empty".to_string(), String::new()),
        ("exactly-251".to_string(), long),
        ("wide".to_string(), longer),
        ("unicode".to_string(), "ключ → значение".to_string()),
    ];
    let resp = CustomResponse::rows(input.clone());

    for caps in [modern(), legacy_client()] {
        let bytes = resp.packet(&caps, &EncoderConfig::default()).unwrap();
        let (columns, rows) = decode_rows(&bytes, &caps);
        assert_eq!(columns, vec!["Key".to_string(), "Value".to_string()]);
        assert_eq!(rows, input);
    }
}

#[test]
fn packet_counts_follow_capabilities() {
    let resp = CustomResponse::rows([("a", "1"), ("b", "2")]);
    let config = EncoderConfig::default();

    let legacy = split_packets(&resp.packet(&legacy_client(), &config).unwrap()).unwrap();
    let modern = split_packets(&resp.packet(&modern(), &config).unwrap()).unwrap();

    assert_eq!(legacy.len(), modern.len() + 1);
}

#[test]
fn error_decodes_back() {
    let bytes = CustomResponse::error("You have an error in your SQL syntax", 1064)
        .packet(&modern(), &EncoderConfig::default())
        .unwrap();

    let packets = split_packets(&bytes).unwrap();
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].sequence_id, 1);

    let err = PacketReader::new(&packets[0].payload)
        .parse_err_packet()
        .unwrap();
    assert_eq!(err.error_code, 1064);
    assert_eq!(err.error_message, "You have an error in your SQL syntax");
}

#[test]
fn ok_is_fixed() {
    for caps in [modern(), legacy_client(), CapabilityInfo::default()] {
        let bytes = CustomResponse::ok()
            .packet(&caps, &EncoderConfig::default())
            .unwrap();
        assert_eq!(bytes, [0x05, 0x00, 0x00, 0x01, 0xFE, 0x00, 0x00, 0x22, 0x00]);
    }
}

#[test]
fn replaced_query_is_a_valid_request() {
    let mut original = vec![0x00, 0x00, 0x00, 0x00, 0x03];
    original.extend_from_slice(b"SELECT * FROM accounts");
    let payload_len = u8::try_from(original.len() - 4).unwrap();
    original[0] = payload_len;

    let bytes = CustomResponse::replace_query("SELECT id FROM accounts LIMIT 10", original)
        .unwrap()
        .packet(&modern(), &EncoderConfig::default())
        .unwrap();

    let packets = split_packets(&bytes).unwrap();
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].sequence_id, 0);
    assert_eq!(packets[0].payload[0], 0x03);
    assert_eq!(&packets[0].payload[1..], b"SELECT id FROM accounts LIMIT 10");
}

#[test]
fn custom_schema_and_table_reach_column_metadata() {
    let config = EncoderConfig::new().schema("proxy").table("cache_stats");
    let bytes = CustomResponse::rows([("hits", "10")])
        .packet(&modern(), &config)
        .unwrap();

    let packets = split_packets(&bytes).unwrap();
    let def = PacketReader::new(&packets[1].payload)
        .parse_column_definition()
        .unwrap();
    assert_eq!(def.schema, "proxy");
    assert_eq!(def.table, "cache_stats");
    assert_eq!(def.org_table, "cache_stats");
}

#[test]
fn reject_policy_surfaces_overflow() {
    let config = EncoderConfig::new().overflow(LengthOverflow::Reject);
    let huge = "h".repeat(65_536);

    let err = CustomResponse::rows([("k", huge.as_str())])
        .packet(&modern(), &config)
        .unwrap_err();
    assert!(err.is_length_overflow());

    // the default keeps building, with a wrapped length
    assert!(
        CustomResponse::rows([("k", huge.as_str())])
            .packet(&modern(), &EncoderConfig::default())
            .is_ok()
    );
}

#[test]
fn concurrent_builds_are_independent() {
    let caps = legacy_client();
    let config = EncoderConfig::default();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let config = config.clone();
            thread::spawn(move || {
                let rows: Vec<(String, String)> =
                    (0..i).map(|n| (format!("k{n}"), format!("v{n}"))).collect();
                let bytes = CustomResponse::rows(rows.clone())
                    .packet(&caps, &config)
                    .unwrap();
                (rows, bytes)
            })
        })
        .collect();

    for handle in handles {
        let (rows, bytes) = handle.join().unwrap();
        let (_, decoded) = decode_rows(&bytes, &caps);
        assert_eq!(decoded, rows);
    }
}

#[test]
fn long_result_sets_wrap_sequence_ids() {
    let rows: Vec<(String, String)> = (0..300)
        .map(|n| (format!("k{n}"), n.to_string()))
        .collect();
    let bytes = CustomResponse::rows(rows)
        .packet(&legacy_client(), &EncoderConfig::default())
        .unwrap();

    let packets = split_packets(&bytes).unwrap();
    assert_eq!(packets.len(), 305);
    for (i, packet) in packets.iter().enumerate() {
        assert_eq!(usize::from(packet.sequence_id), (i + 1) % 256);
    }
}

#[test]
fn empty_inputs_still_frame() {
    let config = EncoderConfig::new().max_error_message_len(0);
    let bytes = CustomResponse::error("", 0).packet(&modern(), &config).unwrap();
    assert_eq!(bytes, [0x03, 0x00, 0x00, 0x01, 0xFF, 0x00, 0x00]);

    let bytes = CustomResponse::replace_query("", vec![0x00, 0x00, 0x00, 0x00, 0x03])
        .unwrap()
        .packet(&modern(), &EncoderConfig::default())
        .unwrap();
    assert_eq!(bytes, [0x01, 0x00, 0x00, 0x00, 0x03]);
}

#[test]
fn oversize_names_are_a_config_error_under_reject() {
    let config = EncoderConfig::new()
        .schema("s".repeat(70_000))
        .overflow(LengthOverflow::Reject);

    let err = CustomResponse::rows([("k", "v")])
        .packet(&modern(), &config)
        .unwrap_err();
    assert!(err.is_config());
}
