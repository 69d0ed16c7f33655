//! Card registry and deck assembly.
//!
//! The `CardRegistry` stores the resolved cards and characters the
//! data-loading layer supplies, and builds `Deck`s from id lists.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use super::character::{CharacterCard, CharacterId};
use crate::core::DataError;

/// A side's battle deck: the cards to draw from and the character roster.
///
/// The first character is active at battle start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub cards: Vec<Card>,
    pub characters: Vec<CharacterCard>,
}

impl Deck {
    #[must_use]
    pub fn new(cards: Vec<Card>, characters: Vec<CharacterCard>) -> Self {
        Self { cards, characters }
    }

    /// Add a card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: Card) -> Self {
        self.cards.push(card);
        self
    }

    /// Add a character (builder pattern).
    #[must_use]
    pub fn with_character(mut self, character: CharacterCard) -> Self {
        self.characters.push(character);
        self
    }
}

/// Registry of cards and characters.
///
/// ## Example
///
/// ```
/// use debate_clash::cards::{Card, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(Card::new(CardId::new(1), "Lucky Star", 1, 3)).unwrap();
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Lucky Star");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
    characters: FxHashMap<CharacterId, CharacterCard>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card.
    pub fn register(&mut self, card: Card) -> Result<(), DataError> {
        if self.cards.contains_key(&card.id) {
            return Err(DataError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Register a character.
    pub fn register_character(&mut self, character: CharacterCard) -> Result<(), DataError> {
        if self.characters.contains_key(&character.id) {
            return Err(DataError::DuplicateCharacter(character.id));
        }
        self.characters.insert(character.id, character);
        Ok(())
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a character by ID.
    #[must_use]
    pub fn character(&self, id: CharacterId) -> Option<&CharacterCard> {
        self.characters.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }

    /// Build a deck from card and character id lists.
    ///
    /// Card ids may repeat; each occurrence is one copy.
    pub fn build_deck(
        &self,
        card_ids: &[CardId],
        character_ids: &[CharacterId],
    ) -> Result<Deck, DataError> {
        let cards = card_ids
            .iter()
            .map(|&id| self.get(id).cloned().ok_or(DataError::UnknownCard(id)))
            .collect::<Result<Vec<_>, _>>()?;
        let characters = character_ids
            .iter()
            .map(|&id| {
                self.character(id)
                    .cloned()
                    .ok_or(DataError::UnknownCharacter(id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Deck::new(cards, characters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CardRegistry {
        let mut registry = CardRegistry::new();
        registry.register(Card::new(CardId::new(1), "Cheap", 1, 2)).unwrap();
        registry.register(Card::new(CardId::new(2), "Expensive", 5, 9)).unwrap();
        registry
            .register_character(CharacterCard::new(CharacterId::new(1), "Kyon"))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry();
        assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Cheap");
        assert!(registry.get(CardId::new(99)).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = registry();
        let err = registry
            .register(Card::new(CardId::new(1), "Again", 1, 1))
            .unwrap_err();
        assert_eq!(err, DataError::DuplicateCard(CardId::new(1)));
    }

    #[test]
    fn test_find_with_predicate() {
        let registry = registry();
        let cheap: Vec<_> = registry.find(|c| c.cost <= 2).collect();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].name, "Cheap");
    }

    #[test]
    fn test_build_deck_with_copies() {
        let registry = registry();
        let deck = registry
            .build_deck(
                &[CardId::new(1), CardId::new(1), CardId::new(2)],
                &[CharacterId::new(1)],
            )
            .unwrap();
        assert_eq!(deck.cards.len(), 3);
        assert_eq!(deck.characters[0].name, "Kyon");
    }

    #[test]
    fn test_build_deck_unknown_ids() {
        let registry = registry();
        assert_eq!(
            registry.build_deck(&[CardId::new(7)], &[]),
            Err(DataError::UnknownCard(CardId::new(7)))
        );
        assert_eq!(
            registry.build_deck(&[], &[CharacterId::new(9)]),
            Err(DataError::UnknownCharacter(CharacterId::new(9)))
        );
    }
}
