//! Token shop: power-up refills and cosmetic wheel skins.
use serde::Serialize;
use std::fmt;

use crate::powerups::PowerUpKind;
use crate::state::GameState;

/// What a shop item grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "grants")]
pub enum ShopItemKind {
    PowerUp(PowerUpKind),
    Cosmetic,
}

/// A single item available in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub kind: ShopItemKind,
}

/// Everything the shop sells, in display order.
pub const SHOP_ITEMS: &[ShopItem] = &[
    ShopItem {
        id: "hintShield",
        name: "Hint Shield",
        price: 10,
        kind: ShopItemKind::PowerUp(PowerUpKind::HintShield),
    },
    ShopItem {
        id: "doubleToken",
        name: "2x Token",
        price: 15,
        kind: ShopItemKind::PowerUp(PowerUpKind::DoubleToken),
    },
    ShopItem {
        id: "streakFreeze",
        name: "Streak Save",
        price: 25,
        kind: ShopItemKind::PowerUp(PowerUpKind::StreakFreeze),
    },
    ShopItem {
        id: "wheelSkinSpace",
        name: "Space Wheel",
        price: 50,
        kind: ShopItemKind::Cosmetic,
    },
    ShopItem {
        id: "wheelSkinOcean",
        name: "Ocean Wheel",
        price: 50,
        kind: ShopItemKind::Cosmetic,
    },
    ShopItem {
        id: "wheelSkinRainbow",
        name: "Rainbow Wheel",
        price: 100,
        kind: ShopItemKind::Cosmetic,
    },
];

/// Look up a shop item by id.
#[must_use]
pub fn find_item(item_id: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|item| item.id == item_id)
}

/// Why a purchase did not go through. These are expected player-facing
/// outcomes rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseRejection {
    UnknownItem,
    InsufficientTokens { price: u32, tokens: u32 },
    AlreadyOwned,
}

impl fmt::Display for PurchaseRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem => f.write_str("That item is not for sale."),
            Self::InsufficientTokens { price, tokens } => {
                write!(f, "Not enough tokens! Need {price}, have {tokens}.")
            }
            Self::AlreadyOwned => f.write_str("You already own this!"),
        }
    }
}

impl GameState {
    #[must_use]
    pub fn has_skin(&self, skin_id: &str) -> bool {
        self.purchased_skins().iter().any(|owned| owned == skin_id)
    }

    /// Debit `price` and record `skin_id`. Returns `None` when the player
    /// cannot afford it or already owns it.
    #[must_use]
    pub fn purchase_skin(&self, skin_id: &str, price: u32) -> Option<Self> {
        if self.tokens() < price || self.has_skin(skin_id) {
            return None;
        }
        Some(self.transition(|s| {
            s.tokens -= price;
            s.purchased_skins.push(skin_id.to_string());
        }))
    }

    /// Buy a catalog item: power-ups are debited and added to the inventory,
    /// cosmetics go through [`GameState::purchase_skin`].
    ///
    /// # Errors
    ///
    /// Returns the [`PurchaseRejection`] explaining why the state is unchanged.
    pub fn purchase_item(&self, item_id: &str) -> Result<Self, PurchaseRejection> {
        let item = find_item(item_id).ok_or(PurchaseRejection::UnknownItem)?;
        if self.tokens() < item.price {
            return Err(PurchaseRejection::InsufficientTokens {
                price: item.price,
                tokens: self.tokens(),
            });
        }
        match item.kind {
            ShopItemKind::PowerUp(kind) => Ok(self.transition(|s| {
                s.tokens -= item.price;
                s.power_ups.grant(kind, 1);
            })),
            ShopItemKind::Cosmetic => self
                .purchase_skin(item.id, item.price)
                .ok_or(PurchaseRejection::AlreadyOwned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich(tokens: u32) -> GameState {
        let mut snapshot = GameState::default().into_snapshot();
        snapshot.tokens = tokens;
        GameState::new(snapshot).expect("valid state")
    }

    #[test]
    fn unaffordable_skin_returns_none() {
        let state = rich(30);
        assert!(state.purchase_skin("wheelSkinSpace", 50).is_none());
        assert_eq!(state.tokens(), 30);
    }

    #[test]
    fn skin_purchase_debits_and_records() {
        let bought = rich(60)
            .purchase_skin("wheelSkinSpace", 50)
            .expect("affordable");
        assert_eq!(bought.tokens(), 10);
        assert!(bought.has_skin("wheelSkinSpace"));
        assert_eq!(bought.purchased_skins(), ["wheelSkinSpace".to_string()]);
    }

    #[test]
    fn owned_skin_cannot_be_bought_twice() {
        let bought = rich(200)
            .purchase_skin("wheelSkinOcean", 50)
            .expect("affordable");
        assert!(bought.purchase_skin("wheelSkinOcean", 50).is_none());
        assert_eq!(
            bought.purchase_item("wheelSkinOcean"),
            Err(PurchaseRejection::AlreadyOwned)
        );
    }

    #[test]
    fn power_up_purchase_debits_tokens() {
        let state = rich(30);
        let bought = state.purchase_item("streakFreeze").expect("affordable");
        assert_eq!(bought.tokens(), 5);
        assert_eq!(bought.power_ups().streak_freeze, 1);

        let again = bought.purchase_item("streakFreeze");
        assert_eq!(
            again,
            Err(PurchaseRejection::InsufficientTokens {
                price: 25,
                tokens: 5
            })
        );
    }

    #[test]
    fn unknown_items_are_rejected() {
        assert_eq!(
            rich(500).purchase_item("goldenWheel"),
            Err(PurchaseRejection::UnknownItem)
        );
    }

    #[test]
    fn catalog_lookup_and_messages() {
        let rainbow = find_item("wheelSkinRainbow").expect("listed");
        assert_eq!(rainbow.price, 100);
        assert_eq!(rainbow.kind, ShopItemKind::Cosmetic);
        assert_eq!(SHOP_ITEMS.len(), 6);
        assert_eq!(
            PurchaseRejection::AlreadyOwned.to_string(),
            "You already own this!"
        );
    }
}
