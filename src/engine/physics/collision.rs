use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The player character
    Player = 0b0000_0010,

    /// Buildings, log piles and other static props
    Scenery = 0b0000_0100,

    /// Creatures that block the player
    Creature = 0b0000_1000,

    /// Portal trigger zones - only detect the player
    Portal = 0b0001_0000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Everything solid collides with everything, portals only see the player
            CollisionGroups::Default
            | CollisionGroups::Player
            | CollisionGroups::Scenery
            | CollisionGroups::Creature => {
                Group::from_bits_truncate(Group::ALL.bits() & !(CollisionGroups::Portal as u32))
                    | Self::portal_filter(self)
            }
            CollisionGroups::Portal => Group::from_bits_truncate(CollisionGroups::Player as u32),
        };

        InteractionGroups::new(memberships, filter)
    }

    fn portal_filter(self) -> Group {
        if self == CollisionGroups::Player {
            Group::from_bits_truncate(CollisionGroups::Portal as u32)
        } else {
            Group::NONE
        }
    }

    /// Whether colliders in this group are trigger zones rather than solid
    pub fn is_trigger(self) -> bool {
        self == CollisionGroups::Portal
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

impl CollisionEvent {
    /// Both colliders involved in the event
    pub fn colliders(&self) -> (ColliderHandle, ColliderHandle) {
        match *self {
            CollisionEvent::Started {
                collider1,
                collider2,
            }
            | CollisionEvent::Stopped {
                collider1,
                collider2,
            } => (collider1, collider2),
        }
    }

    /// The other collider when `collider` is part of the event
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        let (a, b) = self.colliders();
        if a == collider {
            Some(b)
        } else if b == collider {
            Some(a)
        } else {
            None
        }
    }
}

/// Queue for storing collision events during physics step
///
/// rapier hands events to `&self`, so the buffer sits behind a mutex.
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(16))),
        }
    }

    /// Take every queued event, leaving the queue empty
    pub fn drain(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let event = match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => CollisionEvent::Started {
                collider1: h1,
                collider2: h2,
            },
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => CollisionEvent::Stopped {
                collider1: h1,
                collider2: h2,
            },
        };
        self.push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CollisionGroups; 5] = [
        CollisionGroups::Default,
        CollisionGroups::Player,
        CollisionGroups::Scenery,
        CollisionGroups::Creature,
        CollisionGroups::Portal,
    ];

    #[test]
    fn test_collision_groups_bits() {
        for (i, a) in ALL.iter().enumerate() {
            for (j, b) in ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(*a as u32, *b as u32, "Groups must have unique bits");
                }
            }
        }
    }

    #[test]
    fn test_player_collides_with_scenery() {
        let player = CollisionGroups::Player.to_interaction_groups();
        let scenery = CollisionGroups::Scenery.to_interaction_groups();
        assert!(player.test(scenery));
    }

    #[test]
    fn test_portal_only_sees_player() {
        let portal = CollisionGroups::Portal.to_interaction_groups();
        assert!(portal.test(CollisionGroups::Player.to_interaction_groups()));
        assert!(!portal.test(CollisionGroups::Scenery.to_interaction_groups()));
        assert!(!portal.test(CollisionGroups::Creature.to_interaction_groups()));
        assert!(CollisionGroups::Portal.is_trigger());
        assert!(!CollisionGroups::Scenery.is_trigger());
    }

    #[test]
    fn test_event_other_collider() {
        let a = ColliderHandle::from_raw_parts(1, 0);
        let b = ColliderHandle::from_raw_parts(2, 0);
        let c = ColliderHandle::from_raw_parts(3, 0);
        let event = CollisionEvent::Started {
            collider1: a,
            collider2: b,
        };

        assert_eq!(event.other(a), Some(b));
        assert_eq!(event.other(b), Some(a));
        assert_eq!(event.other(c), None);
    }

    #[test]
    fn test_queue_drain_empties() {
        let queue = CollisionEventQueue::new();
        let a = ColliderHandle::from_raw_parts(1, 0);
        queue.push(CollisionEvent::Stopped {
            collider1: a,
            collider2: a,
        });
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain().len(), 1);
        assert_eq!(queue.len(), 0);
    }
}
