//! Visibility rules: which items may appear on the public site.
//!
//! An item is **eligible** unless its author explicitly hid it:
//!
//! 1. `draft` is explicitly true → hidden
//! 2. otherwise, `visible` is explicitly false → hidden
//! 3. otherwise → eligible
//!
//! Absent flags never hide anything. No other field is consulted.

use crate::content::ContentItem;

pub fn is_visible(item: &ContentItem) -> bool {
    if item.draft.is_true() {
        return false;
    }
    if item.visible.is_false() {
        return false;
    }
    true
}
