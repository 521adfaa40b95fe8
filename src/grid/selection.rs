//! Multi-select over the asset sequence.
//!
//! Selection is keyed by asset id and never touches layout. Range selection
//! resolves ids to positions in the sequence passed to each call, so it stays
//! correct when the list is reordered between clicks.

use std::collections::HashSet;

use crate::models::Asset;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    fn toggles(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the host should do after a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Plain click: open or navigate to the asset. Selection is untouched.
    Open(String),
    SelectionChanged,
    /// Unknown id, or a range click whose anchor is gone.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    MoveToAlbum(String),
}

/// A bulk action together with the ids it applies to, in sequence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRequest {
    pub action: BulkAction,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: HashSet<String>,
    last_clicked_id: Option<String>,
}

fn position_of(assets: &[Asset], id: &str) -> Option<usize> {
    assets.iter().position(|asset| asset.id == id)
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Anchor for shift-click ranges.
    pub fn last_clicked_id(&self) -> Option<&str> {
        self.last_clicked_id.as_deref()
    }

    /// Selected ids in the order they appear in `assets`.
    pub fn ids_in_order(&self, assets: &[Asset]) -> Vec<String> {
        assets
            .iter()
            .filter(|asset| self.selected.contains(&asset.id))
            .map(|asset| asset.id.clone())
            .collect()
    }

    /// Handles a pointer click on `id`.
    ///
    /// Ctrl/Cmd toggles and moves the anchor. Shift with an anchor adds the
    /// inclusive range between anchor and target and keeps the anchor. Any
    /// other click asks the host to open the asset.
    pub fn click(&mut self, assets: &[Asset], id: &str, modifiers: Modifiers) -> ClickOutcome {
        let Some(index) = position_of(assets, id) else {
            return ClickOutcome::Ignored;
        };

        if modifiers.toggles() {
            self.toggle_known(id);
            return ClickOutcome::SelectionChanged;
        }

        if modifiers.shift {
            if let Some(anchor) = self.last_clicked_id.as_deref() {
                let Some(anchor_index) = position_of(assets, anchor) else {
                    return ClickOutcome::Ignored;
                };
                self.select_span(assets, anchor_index, index);
                return ClickOutcome::SelectionChanged;
            }
        }

        ClickOutcome::Open(assets[index].id.clone())
    }

    /// Checkbox toggle: same as a ctrl-click without the modifier.
    /// Returns whether the asset is selected afterwards.
    pub fn toggle(&mut self, assets: &[Asset], id: &str) -> bool {
        if position_of(assets, id).is_none() {
            return false;
        }
        self.toggle_known(id)
    }

    /// Right-click: an unselected asset becomes the sole selection and the
    /// anchor; a selected one leaves the selection intact for bulk actions.
    pub fn context_menu(&mut self, assets: &[Asset], id: &str) {
        if self.selected.contains(id) || position_of(assets, id).is_none() {
            return;
        }
        self.selected.clear();
        self.selected.insert(id.to_string());
        self.last_clicked_id = Some(id.to_string());
    }

    /// Issues a bulk action over the current selection and empties it. The
    /// anchor is kept; `retain_known` drops it once the asset is gone.
    pub fn issue_bulk(&mut self, assets: &[Asset], action: BulkAction) -> BulkRequest {
        let ids = self.ids_in_order(assets);
        tracing::debug!(count = ids.len(), ?action, "Bulk action issued");
        self.selected.clear();
        BulkRequest { action, ids }
    }

    /// Background click or explicit reset.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_clicked_id = None;
    }

    /// Drops ids that are no longer in the sequence, including a stale anchor.
    pub fn retain_known(&mut self, assets: &[Asset]) {
        let known: HashSet<&str> = assets.iter().map(|asset| asset.id.as_str()).collect();
        self.selected.retain(|id| known.contains(id.as_str()));
        if let Some(anchor) = &self.last_clicked_id {
            if !known.contains(anchor.as_str()) {
                self.last_clicked_id = None;
            }
        }
    }

    fn toggle_known(&mut self, id: &str) -> bool {
        let selected = if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        };
        self.last_clicked_id = Some(id.to_string());
        selected
    }

    fn select_span(&mut self, assets: &[Asset], a: usize, b: usize) {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        for asset in &assets[start..=end] {
            self.selected.insert(asset.id.clone());
        }
    }
}
