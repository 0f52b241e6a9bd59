/// Three-way state of an optional mutation field
///
/// A form attribute or JSON key can be missing, present but empty (`""`,
/// JSON `null`), or carry a value. Validation treats these differently, so
/// they are never collapsed into an `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tri<T> {
    #[default]
    Absent,
    Empty,
    Present(T),
}

impl<T> Tri<T> {
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Tri::Present(v) => Some(v),
            _ => None,
        }
    }
}

impl Tri<String> {
    /// Classify raw text: `None` is absent, `""` is empty
    pub fn from_text(text: Option<&str>) -> Self {
        match text {
            None => Tri::Absent,
            Some("") => Tri::Empty,
            Some(s) => Tri::Present(s.to_string()),
        }
    }

    /// The value if present and not only whitespace
    pub fn non_blank(&self) -> Option<&str> {
        self.as_present()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}
