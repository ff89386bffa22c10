//! Integration tests for JSON record streams.

use std::fs::File;
use std::io::BufWriter;

use afpdf::compose::JsonFormat;
use afpdf::error::Error;
use afpdf::interpret::InterpretOptions;
use afpdf::record::{write_json_lines, ControlSequence, Record};
use afpdf::{convert_file, convert_reader, dump_font, load_resources};

const DOCUMENT: &str = r#"
{"kind":"begin_medium_map","name":"M1"}
{"kind":"medium_descriptor","x_unit_base":"ten_inches","x_units_per_unit_base":14400,"x_extent":12240,"y_extent":15840}
{"kind":"page_position","x_origin":0,"y_origin":0}
{"kind":"end_medium_map"}
{"kind":"begin_code_page","name":"T1D0BASE"}
{"kind":"code_page_index","entries":[{"gcgid":"LA010000","code_point":129}]}
{"kind":"end_code_page"}
{"kind":"begin_font","name":"C0H20000"}
{"kind":"font_control","pattern_technology":"laser_matrix_n_bit_wide","pattern_alignment":"one_byte","max_box_width":7,"max_box_height":1}
{"kind":"font_descriptor","nominal_vertical_size":120}
{"kind":"font_position","groups":[{"max_ascender":700,"max_descender":0}]}
{"kind":"font_index","entries":[{"gcgid":"LA010000","character_increment":556,"ascender_height":700,"descender_depth":0,"baseline_offset":700,"a_space":0,"b_space":556,"c_space":0,"fnm_index":0}]}
{"kind":"font_patterns_map","entries":[{"box_width":7,"box_height":1,"pattern_offset":0}]}
{"kind":"font_patterns","data":[126,129]}
{"kind":"end_font"}
{"kind":"begin_page","name":"P1"}
{"kind":"invoke_medium_map","name":"M1"}
{"kind":"map_coded_font","groups":[{"local_id":1,"qualifiers":[{"role":"code_page_name_reference","name":"T1D0BASE"}]}]}
{"kind":"presentation_text_data","controls":[{"op":"absolute_move_baseline","displacement":1440},{"op":"absolute_move_inline","displacement":1440},{"op":"transparent_data","data":[129,129]}]}
{"kind":"end_page"}
"#;

#[test]
fn test_convert_json_document() {
    let conversion = convert_reader(DOCUMENT.as_bytes()).unwrap();

    assert_eq!(conversion.page_count(), 1);
    assert!(conversion.warnings().is_empty());
    assert_eq!(conversion.session.medium("M1").unwrap().width, 8.5);

    let json: serde_json::Value =
        serde_json::from_str(&conversion.to_json(JsonFormat::Compact).unwrap()).unwrap();
    let commands = json.as_array().unwrap();
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[0]["command"], "add_font");
    assert_eq!(commands[0]["em_factor"], 1000.0);
    assert_eq!(commands[0]["glyphs"][0]["ch"], "a");
    assert_eq!(commands[1]["command"], "text");
    assert_eq!(commands[1]["text"], "aa");
    assert_eq!(commands[1]["x"], 72.0);
    assert_eq!(commands[1]["y"], 720.0);
    assert_eq!(commands[2]["command"], "page_break");
    assert_eq!(commands[3]["command"], "close");
}

#[test]
fn test_convert_file_written_as_json_lines() {
    let records = vec![
        Record::BeginMediumMap { name: "M1".into() },
        Record::PagePosition {
            x_origin: 720,
            y_origin: 720,
        },
        Record::EndMediumMap,
        Record::BeginPage { name: "P1".into() },
        Record::InvokeMediumMap { name: "M1".into() },
        Record::PresentationTextData {
            controls: vec![
                ControlSequence::AbsoluteMoveBaseline { displacement: 0 },
                ControlSequence::AbsoluteMoveInline { displacement: 0 },
                ControlSequence::DrawBaselineRule {
                    length: 1440,
                    width: 20,
                },
            ],
        },
        Record::EndPage,
    ];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("document.jsonl");
    write_json_lines(BufWriter::new(File::create(&path).unwrap()), &records).unwrap();

    let conversion = convert_file(&path).unwrap();
    assert_eq!(conversion.commands().len(), 3);
    let json = conversion.to_json(JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"command\": \"line\""));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert_file(dir.path().join("missing.jsonl")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_truncated_stream_is_decoder_error() {
    let truncated = &DOCUMENT[..DOCUMENT.find("\"end_font\"").unwrap()];
    let err = convert_reader(truncated.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Decoder(_)));
}

#[test]
fn test_font_dump_from_stream() {
    let session = load_resources(DOCUMENT.as_bytes(), InterpretOptions::default()).unwrap();
    let dump = dump_font(&session.fonts()[0]);

    assert!(dump.starts_with("Nominal size: 12\n"));
    assert!(dump.contains("code page: T1D0BASE\n"));
    assert!(dump.contains("Code point: 97 (a), EBCDIC: 129\n"));
    assert!(dump.contains("cell dimension: 8(8)x2\n"));
    assert!(dump.ends_with("0......0\n.000000.\n"));
}
