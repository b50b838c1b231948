use propresenter::domain::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Timers,
    EditTimer,
    ConfirmDelete,
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Minutes,
}

/// State of the create/edit timer dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerForm {
    pub name: TextInput,
    pub minutes: TextInput,
    pub focused_field: FormField,
    /// `Some(uuid)` when editing an existing timer, `None` when creating.
    pub editing_uuid: Option<String>,
    pub error: Option<String>,
}

impl TimerForm {
    pub fn create() -> Self {
        Self {
            name: TextInput::new(),
            minutes: TextInput::new(),
            focused_field: FormField::Name,
            editing_uuid: None,
            error: None,
        }
    }

    pub fn edit(timer: &Timer) -> Self {
        let minutes = timer.duration_seconds().unwrap_or(0) / 60;
        Self {
            name: TextInput::from_str(&timer.id.name),
            minutes: TextInput::from_str(&minutes.to_string()),
            focused_field: FormField::Name,
            editing_uuid: Some(timer.id.uuid.clone()),
            error: None,
        }
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInput {
        match self.focused_field {
            FormField::Name => &mut self.name,
            FormField::Minutes => &mut self.minutes,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            FormField::Name => FormField::Minutes,
            FormField::Minutes => FormField::Name,
        };
    }

    /// Validate the form. Returns `(name, duration_seconds)`.
    pub fn parse(&self) -> Result<(String, i64), String> {
        let name = self.name.value.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }

        let minutes: i64 = self
            .minutes
            .value
            .trim()
            .parse()
            .map_err(|_| "Duration must be a whole number of minutes".to_string())?;
        if minutes <= 0 {
            return Err("Duration must be at least one minute".to_string());
        }

        Ok((name.to_string(), minutes * 60))
    }
}

/// What the delete-confirm dialog is about to remove.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteContext {
    pub uuid: String,
    pub name: String,
}

/// Single-line text input. The cursor is a byte offset kept on a char
/// boundary of `value`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.boundary_before(self.cursor) {
            self.value.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.boundary_before(self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.boundary_after(self.cursor) {
            self.cursor = next;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// The value split at the cursor, for drawing a block cursor in between.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.cursor)
    }

    fn boundary_before(&self, pos: usize) -> Option<usize> {
        self.value[..pos].char_indices().next_back().map(|(i, _)| i)
    }

    fn boundary_after(&self, pos: usize) -> Option<usize> {
        self.value[pos..].chars().next().map(|c| pos + c.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_parse_requires_name_and_positive_minutes() {
        let mut form = TimerForm::create();
        assert!(form.parse().is_err());

        form.name = TextInput::from_str("Sermon");
        form.minutes = TextInput::from_str("0");
        assert!(form.parse().is_err());

        form.minutes = TextInput::from_str("30");
        assert_eq!(form.parse().unwrap(), ("Sermon".to_string(), 1800));
    }

    #[test]
    fn form_parse_rejects_non_numeric_minutes() {
        let mut form = TimerForm::create();
        form.name = TextInput::from_str("Sermon");
        form.minutes = TextInput::from_str("30m");
        assert!(form.parse().is_err());
    }

    #[test]
    fn text_input_cursor_respects_multibyte_chars() {
        let mut input = TextInput::from_str("böna");
        input.move_left();
        input.move_left();
        input.move_left();
        input.insert('x');
        assert_eq!(input.value, "bxöna");

        input.backspace();
        assert_eq!(input.value, "böna");
        assert_eq!(input.split_at_cursor(), ("b", "öna"));
    }
}
