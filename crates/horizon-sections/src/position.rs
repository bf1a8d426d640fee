//! Position of an item within its section.

/// Where an item sits within its section's item list.
///
/// Views use this to pick edge decorations (rounded top corners on the first
/// row, no divider after the last one, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemPosition {
    /// The first item of a list with more than one item.
    First,
    /// Neither first nor last.
    Middle,
    /// The last item. A single-item list is `Last`, not `First`.
    Last,
}

impl ItemPosition {
    /// Classify the item at `index` in a list of `len` items.
    ///
    /// The last-index check wins over the first-index check, so
    /// `classify(0, 1)` is [`ItemPosition::Last`].
    pub fn classify(index: usize, len: usize) -> Self {
        debug_assert!(index < len, "index {index} out of range for {len} items");
        if index + 1 == len {
            Self::Last
        } else if index == 0 {
            Self::First
        } else {
            Self::Middle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_item_is_last() {
        assert_eq!(ItemPosition::classify(0, 1), ItemPosition::Last);
    }

    #[test]
    fn test_two_items() {
        assert_eq!(ItemPosition::classify(0, 2), ItemPosition::First);
        assert_eq!(ItemPosition::classify(1, 2), ItemPosition::Last);
    }

    #[test]
    fn test_all_lengths() {
        for len in 2..32 {
            for index in 0..len {
                let expected = if index == len - 1 {
                    ItemPosition::Last
                } else if index == 0 {
                    ItemPosition::First
                } else {
                    ItemPosition::Middle
                };
                assert_eq!(ItemPosition::classify(index, len), expected, "{index}/{len}");
            }
        }
    }
}
