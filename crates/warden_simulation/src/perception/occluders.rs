//! Headless collision world: static axis-aligned boxes.

use bevy::prelude::*;

use super::LineOfSight;

/// Axis-aligned box that blocks line of sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occluder {
    pub entity: Entity,
    pub min: Vec3,
    pub max: Vec3,
}

impl Occluder {
    pub fn new(entity: Entity, center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            entity,
            min: center - half,
            max: center + half,
        }
    }

    /// Entry parameter `t ∈ [0, 1]` of the segment into the box (slab method).
    pub fn segment_entry(&self, origin: Vec3, end: Vec3) -> Option<f32> {
        let direction = end - origin;
        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() < 1e-8 {
                // Параллельно slab'у: либо внутри, либо промах
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t1 = (self.min[axis] - o) * inv;
            let mut t2 = (self.max[axis] - o) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_enter = t_enter.max(t1);
            t_exit = t_exit.min(t2);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }
}

/// Default `LineOfSight` backend (no physics engine).
#[derive(Resource, Debug, Clone, Default)]
pub struct Occluders {
    boxes: Vec<Occluder>,
}

impl Occluders {
    pub fn add(&mut self, occluder: Occluder) {
        self.boxes.push(occluder);
    }

    pub fn with(mut self, occluder: Occluder) -> Self {
        self.add(occluder);
        self
    }

    pub fn remove(&mut self, entity: Entity) {
        self.boxes.retain(|b| b.entity != entity);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl LineOfSight for Occluders {
    fn first_hit(&self, origin: Vec3, end: Vec3, ignore: Entity) -> Option<Entity> {
        self.boxes
            .iter()
            .filter(|b| b.entity != ignore)
            .filter_map(|b| b.segment_entry(origin, end).map(|t| (t, b.entity)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, entity)| entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(id: u32, center: Vec3) -> Occluder {
        Occluder::new(Entity::from_raw(id), center, Vec3::new(0.5, 2.0, 2.0))
    }

    #[test]
    fn test_segment_through_box() {
        let occluder = wall(1, Vec3::new(5.0, 0.0, 0.0));
        let t = occluder
            .segment_entry(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))
            .expect("segment crosses the wall");
        assert!((t - 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_segment_stops_short_of_box() {
        let occluder = wall(1, Vec3::new(5.0, 0.0, 0.0));
        assert!(occluder
            .segment_entry(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_segment_misses_box() {
        let occluder = wall(1, Vec3::new(5.0, 0.0, 0.0));
        assert!(occluder
            .segment_entry(Vec3::new(0.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 5.0))
            .is_none());
    }

    #[test]
    fn test_first_hit_is_nearest() {
        let near = wall(1, Vec3::new(3.0, 0.0, 0.0));
        let far = wall(2, Vec3::new(7.0, 0.0, 0.0));
        let occluders = Occluders::default().with(far).with(near);

        let hit = occluders.first_hit(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Entity::from_raw(99));
        assert_eq!(hit, Some(Entity::from_raw(1)));
    }

    #[test]
    fn test_first_hit_skips_ignored() {
        let occluders = Occluders::default().with(wall(1, Vec3::new(3.0, 0.0, 0.0)));
        let hit = occluders.first_hit(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Entity::from_raw(1));
        assert_eq!(hit, None);
    }
}
