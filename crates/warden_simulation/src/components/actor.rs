//! Health and the damage capability.

use bevy::prelude::*;

/// Capability: something that can take damage and die.
///
/// The controller never touches health internals. It only calls
/// `apply_damage` on strike and polls `is_dead` once per tick.
pub trait Damageable {
    /// Apply `amount` and return how much was actually removed.
    fn apply_damage(&mut self, amount: u32) -> u32;

    fn is_dead(&self) -> bool;
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    fn is_dead(&self) -> bool {
        !self.is_alive()
    }
}

/// Marker: hostile agents may acquire this entity as a target.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Targetable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);

        assert_eq!(health.apply_damage(30), 30);
        assert_eq!(health.current, 70);
        assert!(!health.is_dead());

        // Saturating: снимаем только то что осталось
        assert_eq!(health.apply_damage(100), 70);
        assert_eq!(health.current, 0);
        assert!(health.is_dead());
    }
}
