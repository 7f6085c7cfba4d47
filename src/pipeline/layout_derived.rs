//! Layout Derived - Reactive page layout.
//!
//! Recomputes the Taffy layout of the page whenever the terminal size
//! changes. Reading it between resizes returns the cached value.

use std::rc::Rc;

use spark_signals::{derived, Derived};

use super::terminal::terminal_size_signal;
use crate::page::{compute_page_layout, PageLayout, PageTree};

/// Create the layout derived for a mounted page.
pub fn create_layout_derived(page: Rc<PageTree>) -> Derived<PageLayout> {
    let size_signal = terminal_size_signal();

    derived(move || {
        let size = size_signal.get();
        compute_page_layout(&page, size.width, size.height)
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TargetStore;
    use crate::content::ContentModel;
    use crate::pipeline::terminal::set_terminal_size;

    fn setup() -> Rc<PageTree> {
        set_terminal_size(120, 40);
        Rc::new(PageTree::build(&ContentModel::default(), &mut TargetStore::new()))
    }

    #[test]
    fn test_layout_follows_terminal_size() {
        let page = setup();
        let layout_derived = create_layout_derived(page);

        let layout = layout_derived.get();
        assert_eq!((layout.width, layout.height), (120, 40));
        assert!(layout.two_column);

        set_terminal_size(50, 30);
        let layout = layout_derived.get();
        assert_eq!((layout.width, layout.height), (50, 30));
        assert!(!layout.two_column);
    }
}
