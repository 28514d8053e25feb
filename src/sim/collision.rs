//! Contact classification
//!
//! The physics collaborator reports each contact as two bodies in no
//! particular order. Only player/item and item/ground pairs mean anything.

use bitflags::bitflags;

use super::state::DropId;

bitflags! {
    /// Physics category masks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category: u32 {
        const PLAYER = 0b1;
        const ITEM = 0b10;
        const GROUND = 0b100;
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub category: Category,
    /// Set when the body is a drop
    pub drop: Option<DropId>,
}

impl Body {
    pub fn player() -> Self {
        Self {
            category: Category::PLAYER,
            drop: None,
        }
    }

    pub fn ground() -> Self {
        Self {
            category: Category::GROUND,
            drop: None,
        }
    }

    pub fn item(id: DropId) -> Self {
        Self {
            category: Category::ITEM,
            drop: Some(id),
        }
    }
}

/// A begin-contact notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// Both categories as a set
    #[inline]
    pub fn categories(&self) -> Category {
        self.a.category | self.b.category
    }

    /// The drop on the item side of the contact
    pub fn item(&self) -> Option<DropId> {
        if self.a.category == Category::ITEM {
            self.a.drop
        } else if self.b.category == Category::ITEM {
            self.b.drop
        } else {
            None
        }
    }
}

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Collected(DropId),
    Missed(DropId),
    Ignored,
}

/// Turns contacts into game outcomes
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionPolicy;

impl CollisionPolicy {
    pub fn classify(contact: &Contact) -> ContactOutcome {
        let collision = contact.categories();
        let Some(id) = contact.item() else {
            return ContactOutcome::Ignored;
        };

        if collision == Category::PLAYER | Category::ITEM {
            ContactOutcome::Collected(id)
        } else if collision == Category::ITEM | Category::GROUND {
            ContactOutcome::Missed(id)
        } else {
            ContactOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_item_either_order() {
        let id = DropId(4);
        let forward = Contact::new(Body::player(), Body::item(id));
        let reverse = Contact::new(Body::item(id), Body::player());
        assert_eq!(CollisionPolicy::classify(&forward), ContactOutcome::Collected(id));
        assert_eq!(CollisionPolicy::classify(&reverse), ContactOutcome::Collected(id));
    }

    #[test]
    fn test_item_ground_either_order() {
        let id = DropId(9);
        let forward = Contact::new(Body::item(id), Body::ground());
        let reverse = Contact::new(Body::ground(), Body::item(id));
        assert_eq!(CollisionPolicy::classify(&forward), ContactOutcome::Missed(id));
        assert_eq!(CollisionPolicy::classify(&reverse), ContactOutcome::Missed(id));
    }

    #[test]
    fn test_other_pairs_ignored() {
        let pairs = [
            Contact::new(Body::player(), Body::ground()),
            Contact::new(Body::item(DropId(1)), Body::item(DropId(2))),
            Contact::new(Body::player(), Body::player()),
        ];
        for contact in &pairs {
            assert_eq!(CollisionPolicy::classify(contact), ContactOutcome::Ignored);
        }
    }

    #[test]
    fn test_item_without_id_ignored() {
        let anonymous = Body {
            category: Category::ITEM,
            drop: None,
        };
        let contact = Contact::new(Body::player(), anonymous);
        assert_eq!(CollisionPolicy::classify(&contact), ContactOutcome::Ignored);
    }
}
