use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Size;
use unicode_width::UnicodeWidthStr;

/// Host callback that returns the rendered pixel box of a label.
///
/// Called once per visible node during a layout pass. A panicking measurer is a
/// host contract violation and is not caught.
pub trait Measure {
    fn measure(&mut self, text: &str) -> Size;
}

impl<F> Measure for F
where
    F: FnMut(&str) -> Size,
{
    fn measure(&mut self, text: &str) -> Size {
        self(text)
    }
}

/// A measurement surface shared by several diagram instances.
///
/// Every call acquires the surface, measures, and releases it before returning,
/// so measurements from different instances never overlap.
#[derive(Debug)]
pub struct SharedMeasure<M> {
    inner: Rc<RefCell<M>>,
}

impl<M> SharedMeasure<M> {
    pub fn new(measure: M) -> Self {
        Self {
            inner: Rc::new(RefCell::new(measure)),
        }
    }
}

impl<M> Clone for SharedMeasure<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M: Measure> Measure for SharedMeasure<M> {
    fn measure(&mut self, text: &str) -> Size {
        self.inner.borrow_mut().measure(text)
    }
}

/// Fixed-cell measurer: every terminal column is `char_width` pixels wide and
/// every `<br>`-separated line is `line_height` pixels tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 18.0,
        }
    }
}

impl Measure for MonospaceMeasure {
    fn measure(&mut self, text: &str) -> Size {
        Size::new(
            multiline_width(text) as f64 * self.char_width,
            line_count(text) as f64 * self.line_height,
        )
    }
}

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Split text on `<br/>`, `<br>`, `<br />` (case-insensitive).
pub fn split_br(s: &str) -> Vec<&str> {
    let lower = s.to_ascii_lowercase();
    let lower_bytes = lower.as_bytes();
    let mut result = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 3 < lower_bytes.len() {
        if lower_bytes[i] == b'<' && lower_bytes[i + 1] == b'b' && lower_bytes[i + 2] == b'r' {
            let tag_len = if i + 5 <= lower_bytes.len()
                && lower_bytes[i + 3] == b'/'
                && lower_bytes[i + 4] == b'>'
            {
                5 // <br/>
            } else if i + 6 <= lower_bytes.len()
                && lower_bytes[i + 3] == b' '
                && lower_bytes[i + 4] == b'/'
                && lower_bytes[i + 5] == b'>'
            {
                6 // <br />
            } else if lower_bytes[i + 3] == b'>' {
                4 // <br>
            } else {
                0
            };

            if tag_len > 0 {
                result.push(&s[start..i]);
                start = i + tag_len;
                i = start;
                continue;
            }
        }
        i += 1;
    }
    result.push(&s[start..]);
    result
}

/// Maximum display width among lines split by `<br/>`.
pub fn multiline_width(s: &str) -> usize {
    split_br(s)
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0)
}

/// Number of lines after splitting by `<br/>`.
pub fn line_count(s: &str) -> usize {
    split_br(s).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_br_no_break() {
        assert_eq!(split_br("hello"), vec!["hello"]);
    }

    #[test]
    fn split_br_single() {
        assert_eq!(split_br("Hello<br/>World"), vec!["Hello", "World"]);
    }

    #[test]
    fn split_br_variant_no_slash() {
        assert_eq!(split_br("A<br>B"), vec!["A", "B"]);
    }

    #[test]
    fn split_br_variant_space() {
        assert_eq!(split_br("A<br />B"), vec!["A", "B"]);
    }

    #[test]
    fn split_br_case_insensitive() {
        assert_eq!(split_br("A<BR/>B"), vec!["A", "B"]);
        assert_eq!(split_br("A<Br>B"), vec!["A", "B"]);
    }

    #[test]
    fn split_br_multiple() {
        assert_eq!(split_br("A<br/>B<br/>C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn multiline_width_single_line() {
        assert_eq!(multiline_width("hello"), 5);
    }

    #[test]
    fn multiline_width_multi_line() {
        assert_eq!(multiline_width("Hi<br/>World"), 5);
    }

    #[test]
    fn line_count_single() {
        assert_eq!(line_count("hello"), 1);
    }

    #[test]
    fn line_count_multi() {
        assert_eq!(line_count("A<br/>B<br/>C"), 3);
    }

    #[test]
    fn monospace_measure_uses_widest_line() {
        let mut m = MonospaceMeasure {
            char_width: 10.0,
            line_height: 20.0,
        };
        assert_eq!(m.measure("Hi<br/>World"), Size::new(50.0, 40.0));
    }

    #[test]
    fn monospace_measure_counts_wide_glyphs() {
        let mut m = MonospaceMeasure::default();
        assert_eq!(m.measure("日本").width, 4.0 * 8.0);
    }

    #[test]
    fn closure_is_a_measurer() {
        let mut calls = 0;
        let mut m = |text: &str| {
            calls += 1;
            Size::new(text.len() as f64, 1.0)
        };
        assert_eq!(Measure::measure(&mut m, "abc"), Size::new(3.0, 1.0));
        assert_eq!(calls, 1);
    }

    #[test]
    fn shared_measure_serves_every_clone() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&log);
        let shared = SharedMeasure::new(move |text: &str| {
            sink.borrow_mut().push(text.to_string());
            Size::new(1.0, 1.0)
        });
        let mut a = shared.clone();
        let mut b = shared;
        a.measure("from a");
        b.measure("from b");
        assert_eq!(*log.borrow(), vec!["from a".to_string(), "from b".to_string()]);
    }
}
