/// Actions understood by at least one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Insert or replace a binding.
    SaveBinding,
    /// Delete a binding by id.
    DeleteBinding,
    /// List bindings, optionally for one domain.
    GetBindings,
    /// A content script picked an element.
    ElementSelected,
    /// Enter selection mode in a page.
    StartElementSelection,
    /// Re-derive a page's active set.
    ReloadBindings,
    /// Trigger a binding once, without a key press.
    TestBinding,
}

impl Action {
    /// Every action.
    pub const ALL: [Self; 7] = [
        Self::SaveBinding,
        Self::DeleteBinding,
        Self::GetBindings,
        Self::ElementSelected,
        Self::StartElementSelection,
        Self::ReloadBindings,
        Self::TestBinding,
    ];

    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaveBinding => "saveBinding",
            Self::DeleteBinding => "deleteBinding",
            Self::GetBindings => "getBindings",
            Self::ElementSelected => "elementSelected",
            Self::StartElementSelection => "startElementSelection",
            Self::ReloadBindings => "reloadBindings",
            Self::TestBinding => "testBinding",
        }
    }

    /// Parse a wire name.
    pub fn try_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for a in Action::ALL {
            assert_eq!(Action::try_from_str(a.as_str()), Some(a));
        }
        assert_eq!(Action::try_from_str("SaveBinding"), None);
    }
}
