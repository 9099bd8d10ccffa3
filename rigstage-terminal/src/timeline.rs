/// Timeline strip: frame ruler, keyframe markers and playhead in two rows
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use rigstage_core::{Frame, Keyframe, TimelineRuler};
use std::io::Write;

const PLAYHEAD: char = '\u{2503}';
const KEYFRAME: char = '\u{25c6}';

type Cells = Vec<(char, Color)>;

pub struct TimelineStrip {
    ruler: TimelineRuler,
    columns: usize,
}

impl TimelineStrip {
    pub fn new(ruler: TimelineRuler) -> Self {
        Self {
            columns: ruler.width() as usize,
            ruler,
        }
    }

    /// Frame under a mouse click on `column`
    pub fn frame_at_column(&self, column: u16) -> Frame {
        self.ruler.frame_at(f32::from(column) + 0.5)
    }

    fn column_of(&self, x: f32) -> Option<usize> {
        let column = x.floor() as usize;
        (column < self.columns).then_some(column)
    }

    fn place_playhead(&self, cells: &mut Cells, current: Frame) {
        if let Some(column) = self.column_of(self.ruler.marker_x(current)) {
            cells[column] = (PLAYHEAD, Color::Red);
        }
    }

    fn ruler_cells(&self, current: Frame) -> Cells {
        let mut cells = vec![(' ', Color::DarkGrey); self.columns];

        for tick in self.ruler.ticks() {
            let Some(column) = self.column_of(tick.x) else {
                continue;
            };
            cells[column] = ('|', Color::DarkGrey);

            if tick.labeled {
                let label = tick.frame.to_string();
                for (offset, digit) in label.chars().enumerate() {
                    if let Some(cell) = cells.get_mut(column + 1 + offset) {
                        *cell = (digit, Color::Grey);
                    }
                }
            }
        }

        self.place_playhead(&mut cells, current);
        cells
    }

    fn keyframe_cells(&self, keyframes: &[Keyframe], current: Frame) -> Cells {
        let mut cells = vec![(' ', Color::DarkGrey); self.columns];

        for key in keyframes {
            if let Some(column) = self.column_of(self.ruler.marker_x(key.frame)) {
                cells[column] = (KEYFRAME, Color::Cyan);
            }
        }

        self.place_playhead(&mut cells, current);
        cells
    }

    pub fn ruler_text(&self, current: Frame) -> String {
        self.ruler_cells(current).into_iter().map(|(c, _)| c).collect()
    }

    pub fn keyframe_text(&self, keyframes: &[Keyframe], current: Frame) -> String {
        self.keyframe_cells(keyframes, current)
            .into_iter()
            .map(|(c, _)| c)
            .collect()
    }

    pub fn draw_ruler<W: Write>(&self, writer: &mut W, current: Frame) -> std::io::Result<()> {
        draw_cells(writer, &self.ruler_cells(current))
    }

    pub fn draw_keyframes<W: Write>(
        &self,
        writer: &mut W,
        keyframes: &[Keyframe],
        current: Frame,
    ) -> std::io::Result<()> {
        draw_cells(writer, &self.keyframe_cells(keyframes, current))
    }
}

fn draw_cells<W: Write>(writer: &mut W, cells: &[(char, Color)]) -> std::io::Result<()> {
    for (character, color) in cells {
        writer.queue(SetForegroundColor(*color))?;
        writer.queue(Print(*character))?;
    }
    writer.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> TimelineStrip {
        TimelineStrip::new(TimelineRuler::new(120, 120.0))
    }

    #[test]
    fn test_click_maps_to_frame() {
        let strip = strip();
        assert_eq!(strip.frame_at_column(0), 0);
        assert_eq!(strip.frame_at_column(57), 57);
        assert_eq!(strip.frame_at_column(500), 119);

        let wide = TimelineStrip::new(TimelineRuler::new(120, 240.0));
        assert_eq!(wide.frame_at_column(41), 20);
    }

    #[test]
    fn test_ruler_labels_and_playhead() {
        let text: Vec<char> = strip().ruler_text(33).chars().collect();
        assert_eq!(text.len(), 120);
        assert_eq!(text[5], '|');
        assert_eq!(text[10], '|');
        assert_eq!((text[11], text[12]), ('1', '0'));
        assert_eq!(text[33], PLAYHEAD);
    }

    #[test]
    fn test_keyframe_markers() {
        let keys = vec![Keyframe::transform(4), Keyframe::transform(90), Keyframe::transform(90)];
        let text: Vec<char> = strip().keyframe_text(&keys, 0).chars().collect();
        assert_eq!(text[0], PLAYHEAD);
        assert_eq!(text[4], KEYFRAME);
        assert_eq!(text[90], KEYFRAME);
        assert_eq!(text.iter().filter(|c| **c == KEYFRAME).count(), 2);
    }
}
