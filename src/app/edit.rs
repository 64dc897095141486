/// Scratch state for a row in `Editing`. A row with no buffer is `Viewing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    /// Title captured on entry; shown again on cancel or a blank commit.
    pub rollback: String,
    pub value: String,
    /// Byte offset into `value`.
    pub cursor: usize,
}

impl EditBuffer {
    pub fn begin(title: &str) -> Self {
        EditBuffer {
            rollback: title.to_string(),
            value: title.to_string(),
            cursor: title.len(),
        }
    }

    /// Replace the whole value, leaving the cursor at the end.
    pub fn set_value(&mut self, value: String) {
        self.cursor = value.len();
        self.value = value;
    }
}

/// How a row should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode<'a> {
    Viewing,
    Editing(&'a EditBuffer),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_captures_rollback_and_puts_cursor_at_end() {
        let buf = EditBuffer::begin("Buy milk");
        assert_eq!(buf.rollback, "Buy milk");
        assert_eq!(buf.value, "Buy milk");
        assert_eq!(buf.cursor, 8);
    }

    #[test]
    fn set_value_moves_cursor() {
        let mut buf = EditBuffer::begin("Buy milk");
        buf.set_value("Buy bread please".into());
        assert_eq!(buf.cursor, 16);
        assert_eq!(buf.rollback, "Buy milk");
    }
}
