//! Benchmarks for afpdf interpretation performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic record streams: one raster font with a
//! configurable number of glyphs and pages of positioned text.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use afpdf::record::{
    write_json_lines, CodePageEntry, ControlSequence, FontIndexEntry, FontPositionGroup,
    FullyQualifiedName, MapCodedFontGroup, NameRole, PatternAlignment, PatternMapEntry,
    PatternTechnology, Record, VecSource,
};
use afpdf::{convert, convert_reader, RecordingComposer};

/// Glyph box of the synthetic font: 24x32 pixels, 96 bytes per cell.
const BOX_WIDTH: u32 = 23;
const BOX_HEIGHT: u32 = 31;
const CELL_BYTES: u32 = 24 * 32 / 8;

/// Creates a record stream with a font of `glyphs` glyphs and `pages` pages.
fn create_test_stream(glyphs: u32, pages: usize) -> Vec<Record> {
    let gcgid = |i: u32| format!("LA{:02}0000", i % 100);
    let glyphs = glyphs.min(100);

    let mut records = vec![
        Record::BeginCodePage {
            name: "T1D0BASE".into(),
        },
        Record::CodePageIndex {
            entries: (0..glyphs)
                .map(|i| CodePageEntry {
                    gcgid: gcgid(i),
                    code_point: 0x81 + i as u16,
                })
                .collect(),
        },
        Record::EndCodePage,
        Record::BeginFont {
            name: "C0BENCH0".into(),
        },
        Record::FontControl {
            pattern_technology: PatternTechnology::LaserMatrixNBitWide,
            pattern_alignment: PatternAlignment::OneByte,
            max_box_width: BOX_WIDTH,
            max_box_height: BOX_HEIGHT,
        },
        Record::FontDescriptor {
            nominal_vertical_size: 120,
        },
        Record::FontPosition {
            groups: vec![FontPositionGroup {
                max_ascender: 750,
                max_descender: 250,
            }],
        },
        Record::FontIndex {
            entries: (0..glyphs)
                .map(|i| FontIndexEntry {
                    gcgid: gcgid(i),
                    character_increment: 556,
                    ascender_height: 700,
                    descender_depth: 200,
                    baseline_offset: 700,
                    a_space: 30,
                    b_space: 500,
                    c_space: 26,
                    fnm_index: i,
                })
                .collect(),
        },
        Record::FontPatternsMap {
            entries: (0..glyphs)
                .map(|i| PatternMapEntry {
                    box_width: BOX_WIDTH,
                    box_height: BOX_HEIGHT,
                    pattern_offset: i * CELL_BYTES,
                })
                .collect(),
        },
        Record::FontPatterns {
            data: (0..glyphs * CELL_BYTES).map(|b| b as u8).collect(),
        },
        Record::EndFont,
    ];

    for page in 0..pages {
        records.push(Record::BeginPage {
            name: format!("P{}", page + 1),
        });
        records.push(Record::MapCodedFont {
            groups: vec![MapCodedFontGroup {
                local_id: 1,
                qualifiers: vec![FullyQualifiedName {
                    role: NameRole::CodePageNameReference,
                    name: "T1D0BASE".into(),
                }],
            }],
        });
        for line in 0..50 {
            records.push(Record::PresentationTextData {
                controls: vec![
                    ControlSequence::AbsoluteMoveBaseline {
                        displacement: 720 + line * 280,
                    },
                    ControlSequence::AbsoluteMoveInline { displacement: 720 },
                    ControlSequence::TransparentData {
                        data: (0..60).map(|i| 0x81 + (i % 9) as u8).collect(),
                    },
                    ControlSequence::DrawInlineRule {
                        length: 8640,
                        width: 10,
                    },
                ],
            });
        }
        records.push(Record::EndPage);
    }
    records
}

/// Benchmark font reconstruction at various glyph counts.
fn bench_font_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("font_assembly");

    for glyphs in [10, 50, 100].iter() {
        let records = create_test_stream(*glyphs, 0);

        group.bench_function(format!("{}_glyphs", glyphs), |b| {
            b.iter(|| {
                convert(
                    VecSource::new(black_box(records.clone())),
                    RecordingComposer::new(),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark page interpretation at various sizes.
fn bench_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pages");

    for pages in [1, 5, 10].iter() {
        let records = create_test_stream(50, *pages);

        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| {
                convert(
                    VecSource::new(black_box(records.clone())),
                    RecordingComposer::new(),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark decoding a JSON record stream.
fn bench_json_source(c: &mut Criterion) {
    let mut data = Vec::new();
    write_json_lines(&mut data, &create_test_stream(50, 2)).unwrap();

    c.bench_function("json_stream_2_pages", |b| {
        b.iter(|| convert_reader(black_box(data.as_slice())).unwrap());
    });
}

criterion_group!(benches, bench_font_assembly, bench_pages, bench_json_source);
criterion_main!(benches);
