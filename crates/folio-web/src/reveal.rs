#![forbid(unsafe_code)]

//! Fade-in reveal for project and feature cards.
//!
//! Cards start hidden and offset downwards. The first time the visibility
//! observer reports a card as intersecting it is revealed, and it stays
//! revealed: scrolling it back out never hides it again.

/// Cards animated by the reveal observer.
pub const CARD_SELECTOR: &str = ".project-card, .feature-project";

/// Transition declared on every card at init.
pub const CARD_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// Inline styles for a card in one of its two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyle {
    pub opacity: &'static str,
    pub transform: &'static str,
}

pub const HIDDEN_CARD: CardStyle = CardStyle {
    opacity: "0",
    transform: "translateY(30px)",
};

pub const VISIBLE_CARD: CardStyle = CardStyle {
    opacity: "1",
    transform: "translateY(0)",
};

/// Options for the intersection observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the card that must be visible.
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport.
    pub bottom_margin: f64,
}

impl RevealOptions {
    /// CSS `rootMargin` string, e.g. `0px 0px -100px 0px`.
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin)
    }
}

/// One card's reveal state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CardReveal {
    revealed: bool,
}

impl CardReveal {
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Feed one observer entry. Returns true only on the hidden-to-visible edge.
    pub fn observe(&mut self, is_intersecting: bool) -> bool {
        if is_intersecting && !self.revealed {
            self.revealed = true;
            return true;
        }
        false
    }

    #[must_use]
    pub const fn style(&self) -> CardStyle {
        if self.revealed { VISIBLE_CARD } else { HIDDEN_CARD }
    }
}

/// Reveal state for every observed card, indexed in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevealSet {
    cards: Vec<CardReveal>,
}

impl RevealSet {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            cards: vec![CardReveal::default(); count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CardReveal> {
        self.cards.get(index)
    }

    /// Unknown indices are ignored.
    pub fn observe(&mut self, index: usize, is_intersecting: bool) -> bool {
        self.cards
            .get_mut(index)
            .is_some_and(|card| card.observe(is_intersecting))
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_revealed()).count()
    }

    /// Indices of cards still hidden, in document order.
    pub fn unrevealed(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.is_revealed())
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_formats_whole_pixels() {
        let options = RevealOptions {
            threshold: 0.1,
            bottom_margin: 100.0,
        };
        assert_eq!(options.root_margin(), "0px 0px -100px 0px");
    }

    #[test]
    fn reveal_is_one_way() {
        let mut card = CardReveal::default();
        assert_eq!(card.style(), HIDDEN_CARD);
        assert!(!card.observe(false));
        assert!(card.observe(true));
        assert!(!card.observe(false));
        assert!(!card.observe(true));
        assert_eq!(card.style(), VISIBLE_CARD);
    }

    #[test]
    fn set_ignores_unknown_cards() {
        let mut set = RevealSet::new(2);
        assert!(!set.observe(5, true));
        assert!(set.observe(1, true));
        assert_eq!(set.revealed_count(), 1);
        assert!(!set.get(0).unwrap().is_revealed());
        assert_eq!(set.unrevealed().collect::<Vec<_>>(), vec![0]);
    }
}
