/// One tab of a [`TabStack`]. The tab's content is looked up by `id` in the owning dock space.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub can_close: bool,
}

/// An ordered group of tabs with at most one active tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TabStack {
    tabs: Vec<Tab>,
    active: Option<usize>,
}

impl TabStack {
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Append a tab. Ids are unique: a duplicate is refused.
    ///
    /// The first tab added to an empty stack becomes the active one.
    pub fn add_tab(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        can_close: bool,
    ) -> bool {
        let id = id.into();
        if self.contains(&id) {
            log::warn!("tab with id {id:?} already exists");
            return false;
        }

        self.tabs.push(Tab {
            id,
            label: label.into(),
            can_close,
        });
        if self.tabs.len() == 1 {
            self.active = Some(0);
        }
        true
    }

    /// Remove a tab by id.
    ///
    /// Removing the active tab activates the one after it, or the one before it if it was the last.
    pub fn remove_tab(&mut self, id: &str) -> Option<Tab> {
        let index = self.position(id)?;
        let tab = self.tabs.remove(index);

        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Some(tab)
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active?)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_tab().is_some_and(|t| t.id == id)
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
    }

    /// Move every tab of `other` to the end of this stack. Ids already present here are dropped.
    ///
    /// If this stack was empty, `other`'s active tab stays active.
    pub fn append(&mut self, other: &mut Self) {
        let was_empty = self.is_empty();
        let other_active = other.active_tab().map(|t| t.id.clone());
        for tab in other.tabs.drain(..) {
            self.add_tab(tab.id, tab.label, tab.can_close);
        }
        other.active = None;

        if let (true, Some(id)) = (was_empty, other_active) {
            self.set_active(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(ids: &[&str]) -> TabStack {
        let mut s = TabStack::default();
        for id in ids {
            assert!(s.add_tab(*id, id.to_uppercase(), true));
        }
        s
    }

    fn active_id(s: &TabStack) -> Option<&str> {
        s.active_tab().map(|t| t.id.as_str())
    }

    #[test]
    fn first_tab_becomes_active() {
        let s = stack(&["a", "b"]);
        assert_eq!(active_id(&s), Some("a"));
        assert_eq!(s.tabs()[1].label, "B");
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut s = stack(&["a"]);
        assert!(!s.add_tab("a", "again", false));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn removing_active_activates_next_then_previous() {
        let mut s = stack(&["a", "b", "c"]);
        assert!(s.set_active("b"));
        assert!(s.remove_tab("b").is_some());
        assert_eq!(active_id(&s), Some("c"));

        assert!(s.remove_tab("c").is_some());
        assert_eq!(active_id(&s), Some("a"));

        assert!(s.remove_tab("a").is_some());
        assert_eq!(active_id(&s), None);
        assert!(s.is_empty());
    }

    #[test]
    fn removing_before_active_keeps_it() {
        let mut s = stack(&["a", "b", "c"]);
        assert!(s.set_active("c"));
        assert!(s.remove_tab("a").is_some());
        assert_eq!(active_id(&s), Some("c"));
        assert!(s.remove_tab("zzz").is_none());
        assert!(!s.set_active("zzz"));
    }

    #[test]
    fn append_moves_tabs() {
        let mut left = TabStack::default();
        let mut root = stack(&["a", "b"]);
        assert!(root.set_active("b"));
        left.append(&mut root);
        assert!(root.is_empty());
        assert_eq!(active_id(&root), None);
        assert_eq!(left.len(), 2);
        assert_eq!(active_id(&left), Some("b"));
    }
}
