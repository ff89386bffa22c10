//! Presentation text interpretation.

use serde::Serialize;

use super::session::Session;
use crate::compose::{PageComposer, Rgb};
use crate::error::Result;
use crate::model::FontProperties;
use crate::record::ControlSequence;
use crate::units::to_points;

/// Text cursor and attributes carried between control sequences.
///
/// `top`, the font and the color persist across presentation text records;
/// `left` and the text buffer start over with each record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextState {
    /// Baseline position in 1/1440 inch, page offset included
    pub top: i32,
    /// Inline position in 1/1440 inch, page offset included
    pub left: i32,
    /// Active coded font local id
    pub font_local_id: u8,
    /// Active text color
    pub rgb: Rgb,
    /// Last transparent data decoded
    pub text: String,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            top: 0,
            left: 0,
            font_local_id: 1,
            rgb: [0, 0, 0],
            text: String::new(),
        }
    }
}

/// Distance in points a line of `font` is moved down so that text measured
/// from its top lands on the baseline.
pub fn baseline_shift(font: &FontProperties) -> f32 {
    (font.max_descender as f32 / 500.0) * font.nominal_size as f32
}

/// Apply the control sequences of one presentation text record.
pub fn interpret_text<C: PageComposer + ?Sized>(
    session: &mut Session,
    composer: &mut C,
    controls: &[ControlSequence],
) -> Result<()> {
    session.text.left = 0;
    session.text.text.clear();

    let (x_offset, y_offset) = session.page_offset();

    for control in controls {
        match control {
            ControlSequence::NoOperation { data } => {
                log::trace!("NOP: {}", session.options.charset.decode(data));
            }
            ControlSequence::AbsoluteMoveBaseline { displacement } => {
                session.text.top = displacement.saturating_add(y_offset);
            }
            ControlSequence::AbsoluteMoveInline { displacement } => {
                session.text.left = displacement.saturating_add(x_offset);
            }
            ControlSequence::SetCodedFontLocal { id } => {
                session.text.font_local_id = *id;
            }
            ControlSequence::SetTextColor { color } => {
                session.text.rgb = color.to_rgb();
            }
            ControlSequence::DrawInlineRule { length, width } => {
                let top = to_points(session.text.top);
                let left = to_points(session.text.left);
                composer.draw_line(
                    left,
                    top,
                    left + to_points(*length),
                    top,
                    to_points(*width),
                )?;
            }
            ControlSequence::DrawBaselineRule { length, width } => {
                let top = to_points(session.text.top);
                let left = to_points(session.text.left);
                composer.draw_line(
                    left,
                    top,
                    left,
                    top + to_points(*length),
                    to_points(*width),
                )?;
            }
            ControlSequence::TransparentData { data } => {
                let local_id = session.text.font_local_id;
                let shift = baseline_shift(session.font(local_id)?);
                let handle = session.font_handle(local_id)?;
                session.text.text = session.options.charset.decode(data);

                composer.add_text(
                    &session.text.text,
                    handle,
                    shift,
                    to_points(session.text.left),
                    to_points(session.text.top),
                    session.text.rgb,
                )?;
            }
            ControlSequence::Other { function_type } => {
                log::trace!("control sequence {:#04x} ignored", function_type);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ComposeCommand, FontHandle, RecordingComposer};
    use crate::error::{Error, LookupKind};
    use crate::record::ColorValue;

    fn session_with_font() -> (Session, RecordingComposer) {
        let mut session = Session::default();
        session.begin_font();
        let builder = session.font_builder().unwrap();
        builder.descriptor(100);
        builder.position(&[crate::record::FontPositionGroup {
            max_ascender: 800,
            max_descender: 250,
        }]);
        session.end_font().unwrap();

        let mut composer = RecordingComposer::new();
        let handle = composer.add_raster_font(&session.fonts()[0]).unwrap();
        session.set_font_handles(vec![handle]);
        (session, composer)
    }

    #[test]
    fn test_baseline_shift() {
        let mut font = FontProperties::new();
        font.nominal_size = 10;
        font.max_descender = 250;
        assert_eq!(baseline_shift(&font), 5.0);
    }

    #[test]
    fn test_text_placement() {
        let (mut session, mut composer) = session_with_font();
        interpret_text(
            &mut session,
            &mut composer,
            &[
                ControlSequence::AbsoluteMoveBaseline { displacement: 250 },
                ControlSequence::AbsoluteMoveInline { displacement: 1440 },
                ControlSequence::SetTextColor {
                    color: ColorValue::Oca(2),
                },
                ControlSequence::TransparentData {
                    data: vec![0xC8, 0x89],
                },
            ],
        )
        .unwrap();

        assert_eq!(session.text_state().text, "Hi");
        match &composer.commands()[1] {
            ComposeCommand::Text {
                text,
                font,
                x,
                y,
                rgb,
                ..
            } => {
                assert_eq!(text, "Hi");
                assert_eq!(*font, FontHandle(0));
                assert_eq!(*x, 72.0);
                assert_eq!(*y, 792.0 - 12.5 - 5.0);
                assert_eq!(*rgb, [255, 0, 0]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_left_resets_top_persists() {
        let (mut session, mut composer) = session_with_font();
        interpret_text(
            &mut session,
            &mut composer,
            &[
                ControlSequence::AbsoluteMoveBaseline { displacement: 400 },
                ControlSequence::AbsoluteMoveInline { displacement: 200 },
            ],
        )
        .unwrap();
        interpret_text(&mut session, &mut composer, &[]).unwrap();

        assert_eq!(session.text_state().top, 400);
        assert_eq!(session.text_state().left, 0);
    }

    #[test]
    fn test_rules() {
        let (mut session, mut composer) = session_with_font();
        interpret_text(
            &mut session,
            &mut composer,
            &[
                ControlSequence::AbsoluteMoveBaseline { displacement: 200 },
                ControlSequence::AbsoluteMoveInline { displacement: 100 },
                ControlSequence::DrawInlineRule {
                    length: 400,
                    width: 20,
                },
                ControlSequence::DrawBaselineRule {
                    length: 400,
                    width: 20,
                },
            ],
        )
        .unwrap();

        assert_eq!(
            composer.commands()[1],
            ComposeCommand::Line {
                page: 1,
                x1: 5.0,
                y1: 782.0,
                x2: 25.0,
                y2: 782.0,
                width: 1.0,
            }
        );
        assert_eq!(
            composer.commands()[2],
            ComposeCommand::Line {
                page: 1,
                x1: 5.0,
                y1: 782.0,
                x2: 5.0,
                y2: 762.0,
                width: 1.0,
            }
        );
    }

    #[test]
    fn test_extreme_displacement_saturates() {
        let (mut session, mut composer) = session_with_font();
        session.begin_medium("M1");
        session.set_page_position(100, 100);
        session.end_medium();
        session.invoke_medium("M1").unwrap();

        interpret_text(
            &mut session,
            &mut composer,
            &[
                ControlSequence::AbsoluteMoveBaseline {
                    displacement: i32::MAX,
                },
                ControlSequence::AbsoluteMoveInline {
                    displacement: i32::MIN,
                },
            ],
        )
        .unwrap();

        assert_eq!(session.text_state().top, i32::MAX);
        assert_eq!(session.text_state().left, i32::MIN + 100);
    }

    #[test]
    fn test_unknown_font_local_id() {
        let (mut session, mut composer) = session_with_font();
        let err = interpret_text(
            &mut session,
            &mut composer,
            &[
                ControlSequence::SetCodedFontLocal { id: 2 },
                ControlSequence::TransparentData { data: vec![0xC1] },
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Lookup {
                kind: LookupKind::Font,
                ..
            }
        ));
    }
}
