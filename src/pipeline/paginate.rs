//! Text pagination: place each line of a text block on fixed-size pages.
//!
//! Layout is deliberately simple. Lines are never wrapped; the only thing
//! that triggers a new page is running out of vertical space. The cursor
//! starts `top_offset` below the top edge and moves down by `line_height`
//! after every placed line. The overflow check runs *after* a line is
//! placed, so a line may sit exactly on the bottom margin and only the
//! following line goes to the next page.
//!
//! With the reference A4 geometry (595 × 842, offset 50, line height 20,
//! bottom margin 50) the cursor runs 792, 772, …, 52, so 38 lines fit on a page.

use crate::error::KitchenError;
use serde::{Deserialize, Serialize};

/// Page size and margins, in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    /// Distance from the top edge to the first baseline.
    pub top_offset: f32,
    pub line_height: f32,
    /// The cursor may not drop below this before a page break.
    pub bottom_margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

impl PageGeometry {
    /// Reference geometry: A4 portrait with 50pt margins and 20pt leading.
    pub const A4: PageGeometry = PageGeometry {
        width: 595.0,
        height: 842.0,
        left_margin: 50.0,
        top_offset: 50.0,
        line_height: 20.0,
        bottom_margin: 50.0,
    };

    /// Build a validated geometry.
    ///
    /// # Errors
    /// [`KitchenError::InvalidConfig`] when a value is not finite,
    /// `line_height <= 0`, `top_offset >= height` or `bottom_margin >= height`.
    pub fn new(
        width: f32,
        height: f32,
        left_margin: f32,
        top_offset: f32,
        line_height: f32,
        bottom_margin: f32,
    ) -> Result<Self, KitchenError> {
        let g = Self {
            width,
            height,
            left_margin,
            top_offset,
            line_height,
            bottom_margin,
        };
        g.validate()?;
        Ok(g)
    }

    /// Check the geometry invariants.
    pub fn validate(&self) -> Result<(), KitchenError> {
        let values = [
            self.width,
            self.height,
            self.left_margin,
            self.top_offset,
            self.line_height,
            self.bottom_margin,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(KitchenError::InvalidConfig(
                "page geometry values must be finite".into(),
            ));
        }
        if self.line_height <= 0.0 {
            return Err(KitchenError::InvalidConfig(format!(
                "line height must be > 0, got {}",
                self.line_height
            )));
        }
        if self.top_offset >= self.height {
            return Err(KitchenError::InvalidConfig(format!(
                "top offset {} must be smaller than page height {}",
                self.top_offset, self.height
            )));
        }
        if self.bottom_margin >= self.height {
            return Err(KitchenError::InvalidConfig(format!(
                "bottom margin {} must be smaller than page height {}",
                self.bottom_margin, self.height
            )));
        }
        Ok(())
    }

    /// Baseline of the first line on every page.
    pub fn start_y(&self) -> f32 {
        self.height - self.top_offset
    }
}

/// One placed line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    /// Line content with surrounding whitespace trimmed.
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// 0-based page index.
    pub page: usize,
}

/// The lines assigned to one page, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub lines: Vec<LayoutLine>,
}

/// Result of [`paginate`]: never empty, at least one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSequence {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl PageSequence {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// All lines across all pages, in order.
    pub fn lines(&self) -> impl Iterator<Item = &LayoutLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

/// Lay `text` out line by line onto pages of the given geometry.
///
/// Empty text yields one page with zero lines. Blank lines are kept and
/// consume a full line of vertical space.
pub fn paginate(text: &str, geometry: &PageGeometry) -> PageSequence {
    let mut pages = vec![Page::default()];

    if text.is_empty() {
        return PageSequence {
            geometry: *geometry,
            pages,
        };
    }

    let start_y = geometry.start_y();
    let mut y = start_y;
    let mut page = 0usize;
    // A break is taken only when another line actually needs the new page.
    let mut break_pending = false;

    for raw in text.split('\n') {
        if break_pending {
            page += 1;
            pages.push(Page {
                index: page,
                lines: Vec::new(),
            });
            break_pending = false;
        }

        let current = &mut pages[page];
        current.lines.push(LayoutLine {
            text: raw.trim().to_string(),
            x: geometry.left_margin,
            y,
            page,
        });

        y -= geometry.line_height;
        if y < geometry.bottom_margin {
            break_pending = true;
            y = start_y;
        }
    }

    PageSequence {
        geometry: *geometry,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_text_is_one_empty_page() {
        let seq = paginate("", &PageGeometry::A4);
        assert_eq!(seq.page_count(), 1);
        assert_eq!(seq.line_count(), 0);
    }

    #[test]
    fn cursor_starts_below_top_and_steps_down() {
        let seq = paginate("a\nb\nc", &PageGeometry::A4);
        let ys: Vec<f32> = seq.lines().map(|l| l.y).collect();
        assert_eq!(ys, vec![792.0, 772.0, 752.0]);
        assert!(seq.lines().all(|l| l.x == 50.0));
    }

    #[test]
    fn thirty_eight_lines_fit_on_one_page() {
        let seq = paginate(&lines(38), &PageGeometry::A4);
        assert_eq!(seq.page_count(), 1);
        assert_eq!(seq.pages[0].lines.last().map(|l| l.y), Some(52.0));
    }

    #[test]
    fn thirty_ninth_line_spills_to_second_page() {
        let seq = paginate(&lines(39), &PageGeometry::A4);
        assert_eq!(seq.page_count(), 2);
        assert_eq!(seq.pages[0].lines.len(), 38);
        assert_eq!(seq.pages[1].lines.len(), 1);
        let spilled = &seq.pages[1].lines[0];
        assert_eq!(spilled.text, "line 39");
        assert_eq!(spilled.y, 792.0);
        assert_eq!(spilled.page, 1);
    }

    #[test]
    fn line_on_bottom_margin_stays_on_page() {
        // start 100, step 25: 100, 75, 50 all fit; the fourth line breaks.
        let g = PageGeometry::new(200.0, 150.0, 10.0, 50.0, 25.0, 50.0).unwrap();
        let seq = paginate("a\nb\nc\nd", &g);
        assert_eq!(seq.pages[0].lines.len(), 3);
        assert_eq!(seq.pages[0].lines[2].y, 50.0);
        assert_eq!(seq.pages[1].lines[0].text, "d");
    }

    #[test]
    fn whitespace_trimmed_blank_lines_kept() {
        let seq = paginate("  Monday \r\n\n\tTuesday\n", &PageGeometry::A4);
        let texts: Vec<&str> = seq.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Monday", "", "Tuesday", ""]);
        assert_eq!(seq.pages[0].lines[3].y, 732.0);
    }

    #[test]
    fn long_lines_are_not_wrapped() {
        let long = "x".repeat(500);
        let seq = paginate(&long, &PageGeometry::A4);
        assert_eq!(seq.line_count(), 1);
        assert_eq!(seq.pages[0].lines[0].text.len(), 500);
    }

    #[test]
    fn pagination_is_idempotent() {
        let text = lines(120);
        assert_eq!(
            paginate(&text, &PageGeometry::A4),
            paginate(&text, &PageGeometry::A4)
        );
    }

    #[test]
    fn page_indices_are_contiguous() {
        let seq = paginate(&lines(100), &PageGeometry::A4);
        assert_eq!(seq.page_count(), 3);
        for (i, page) in seq.pages.iter().enumerate() {
            assert_eq!(page.index, i);
            assert!(page.lines.iter().all(|l| l.page == i));
        }
    }

    #[test]
    fn geometry_rejects_bad_values() {
        assert!(PageGeometry::new(595.0, 842.0, 50.0, 50.0, 0.0, 50.0).is_err());
        assert!(PageGeometry::new(595.0, 842.0, 50.0, 842.0, 20.0, 50.0).is_err());
        assert!(PageGeometry::new(595.0, 842.0, 50.0, 50.0, 20.0, 900.0).is_err());
        assert!(PageGeometry::new(f32::NAN, 842.0, 50.0, 50.0, 20.0, 50.0).is_err());
        assert!(PageGeometry::A4.validate().is_ok());
    }
}
