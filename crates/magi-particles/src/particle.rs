//! Particle elements and the fixed-size pool that owns them

use rand::Rng;
use serde::Serialize;

/// Delay between the initial activations of consecutive slots
pub const STAGGER_MS: f64 = 20.0;

/// Bits are thin falling strokes, bubbles are small rising dots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Bit,
    Bubble,
}

/// A CSS length in the unit the layer positions with
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Length {
    Px(f32),
    /// Percent of viewport height
    Vh(f32),
}

/// Inline style of one particle element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleStyle {
    pub width_px: f32,
    pub height_px: f32,
    /// Percent of viewport width
    pub left_vw: f32,
    pub bottom: Length,
    pub opacity: f32,
    /// Peak opacity the float animation reaches
    pub opacity_var: f32,
    pub scale: f32,
    pub blur_px: Option<f32>,
    pub duration_s: f32,
    pub delay_s: f32,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            width_px: 0.0,
            height_px: 0.0,
            left_vw: 0.0,
            bottom: Length::Px(-50.0),
            opacity: 0.0,
            opacity_var: 0.0,
            scale: 1.0,
            blur_px: None,
            duration_s: 0.0,
            delay_s: 0.0,
        }
    }
}

/// One pooled element. Created once, restyled on every activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleElement {
    pub id: usize,
    pub kind: ParticleKind,
    pub style: ParticleStyle,
    pub visible: bool,
    pub animating: bool,
}

impl ParticleElement {
    fn hidden(id: usize) -> Self {
        Self {
            id,
            kind: ParticleKind::Bubble,
            style: ParticleStyle::default(),
            visible: false,
            animating: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSlot {
    pub element: ParticleElement,
    pub in_use: bool,
    pub recycle_at_ms: f64,
}

/// Fixed pool of particle elements. Its length never changes after `init`,
/// and every slot that is not in use is hidden.
pub struct ParticlePool {
    slots: Vec<ParticleSlot>,
    creations: usize,
}

impl ParticlePool {
    /// Create `capacity` hidden elements. Returns the pool and the due time
    /// of each slot's first activation, staggered by [`STAGGER_MS`].
    pub fn init(capacity: usize, now_ms: f64) -> (Self, Vec<f64>) {
        let mut slots = Vec::with_capacity(capacity);
        for id in 0..capacity {
            slots.push(ParticleSlot {
                element: ParticleElement::hidden(id),
                in_use: false,
                recycle_at_ms: 0.0,
            });
        }
        let schedule = (0..capacity)
            .map(|i| now_ms + i as f64 * STAGGER_MS)
            .collect();
        log::info!("[particles] pool initialized with {} elements", capacity);
        (
            Self {
                slots,
                creations: capacity,
            },
            schedule,
        )
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Elements ever created; equals `capacity` for the pool's lifetime
    pub fn creations(&self) -> usize {
        self.creations
    }

    pub fn in_use_count(&self) -> usize {
        self.slots.iter().filter(|s| s.in_use).count()
    }

    pub fn slots(&self) -> &[ParticleSlot] {
        &self.slots
    }

    /// Restyle slot `index` and make it visible. Initial activations start
    /// mid-flight somewhere on screen; later ones start below the fold.
    /// Returns false if the slot is missing or already in use.
    pub fn activate<R: Rng>(&mut self, index: usize, is_initial: bool, now_ms: f64, rng: &mut R) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.in_use {
            return false;
        }

        let kind = if rng.random::<f32>() > 0.7 {
            ParticleKind::Bit
        } else {
            ParticleKind::Bubble
        };
        let size = match kind {
            ParticleKind::Bit => rng.random::<f32>() * 20.0 + 10.0,
            ParticleKind::Bubble => rng.random::<f32>() * 6.0 + 2.0,
        };
        let left_vw = rng.random::<f32>() * 100.0;
        let depth = rng.random::<f32>();
        let opacity_var = depth * 0.5 + 0.3;
        let duration_s = rng.random::<f32>() * 15.0 + 10.0;

        let (bottom, opacity, delay_s) = if is_initial {
            (
                Length::Vh(rng.random::<f32>() * 100.0),
                opacity_var,
                -rng.random::<f32>() * duration_s,
            )
        } else {
            (Length::Px(-50.0), 0.0, 0.0)
        };

        slot.element.kind = kind;
        slot.element.style = ParticleStyle {
            width_px: if kind == ParticleKind::Bit { 1.0 } else { size },
            height_px: size,
            left_vw,
            bottom,
            opacity,
            opacity_var,
            scale: depth * 0.5 + 0.5,
            blur_px: (depth < 0.5).then(|| 3.0 * (1.0 - depth)),
            duration_s,
            delay_s,
        };
        slot.element.visible = true;
        slot.element.animating = true;
        slot.in_use = true;
        slot.recycle_at_ms = now_ms + duration_s as f64 * 1000.0;
        true
    }

    /// Hide slot `index` and stop its animation. Returns false if it was not in use.
    pub fn recycle(&mut self, index: usize) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !slot.in_use {
            return false;
        }
        slot.element.visible = false;
        slot.element.animating = false;
        slot.in_use = false;
        true
    }

    /// Indices of in-use slots whose animation has run out
    pub fn expired(&self, now_ms: f64) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.in_use && s.recycle_at_ms <= now_ms)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn assert_consistent(pool: &ParticlePool) {
        for slot in pool.slots() {
            assert_eq!(slot.in_use, slot.element.visible, "slot {}", slot.element.id);
        }
    }

    #[test]
    fn init_creates_hidden_elements_with_stagger() {
        let (pool, schedule) = ParticlePool::init(5, 1000.0);
        assert_eq!(pool.capacity(), 5);
        assert_eq!(pool.creations(), 5);
        assert_eq!(pool.in_use_count(), 0);
        assert_eq!(schedule, vec![1000.0, 1020.0, 1040.0, 1060.0, 1080.0]);
        assert_consistent(&pool);
    }

    #[test]
    fn activate_and_recycle() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let (mut pool, _) = ParticlePool::init(3, 0.0);

        assert!(pool.activate(1, false, 500.0, &mut rng));
        assert!(!pool.activate(1, false, 500.0, &mut rng));
        assert!(!pool.activate(9, false, 500.0, &mut rng));
        assert_eq!(pool.in_use_count(), 1);
        assert_consistent(&pool);

        let slot = &pool.slots()[1];
        assert_eq!(slot.element.style.bottom, Length::Px(-50.0));
        assert_eq!(slot.element.style.opacity, 0.0);
        assert_eq!(slot.element.style.delay_s, 0.0);
        let duration_ms = slot.element.style.duration_s as f64 * 1000.0;
        assert!((slot.recycle_at_ms - (500.0 + duration_ms)).abs() < 1e-6);

        assert!(pool.recycle(1));
        assert!(!pool.recycle(1));
        assert!(!pool.recycle(0));
        assert_eq!(pool.in_use_count(), 0);
        assert!(!pool.slots()[1].element.animating);
        assert_consistent(&pool);
    }

    #[test]
    fn initial_activation_starts_mid_flight() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let (mut pool, _) = ParticlePool::init(40, 0.0);
        for i in 0..40 {
            pool.activate(i, true, 0.0, &mut rng);
        }
        for slot in pool.slots() {
            let style = &slot.element.style;
            assert!(matches!(style.bottom, Length::Vh(v) if (0.0..100.0).contains(&v)));
            assert_eq!(style.opacity, style.opacity_var);
            assert!(style.delay_s <= 0.0 && style.delay_s > -style.duration_s);
        }
    }

    #[test]
    fn styles_stay_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let (mut pool, _) = ParticlePool::init(200, 0.0);
        for i in 0..200 {
            pool.activate(i, false, 0.0, &mut rng);
        }
        let mut bits = 0;
        for slot in pool.slots() {
            let style = &slot.element.style;
            match slot.element.kind {
                ParticleKind::Bit => {
                    bits += 1;
                    assert_eq!(style.width_px, 1.0);
                    assert!((10.0..30.0).contains(&style.height_px));
                }
                ParticleKind::Bubble => {
                    assert!((2.0..8.0).contains(&style.height_px));
                    assert_eq!(style.width_px, style.height_px);
                }
            }
            assert!((0.3..0.8).contains(&style.opacity_var));
            assert!((0.5..1.0).contains(&style.scale));
            assert!((10.0..25.0).contains(&style.duration_s));
            // blur only for the far half, and never more than 3px
            if let Some(blur) = style.blur_px {
                assert!(blur > 1.5 && blur <= 3.0);
                assert!(style.scale < 0.75);
            } else {
                assert!(style.scale >= 0.75);
            }
        }
        assert!(bits > 20 && bits < 100, "bits: {}", bits);
    }

    #[test]
    fn expired_lists_only_overdue_slots() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let (mut pool, _) = ParticlePool::init(3, 0.0);
        pool.activate(0, false, 0.0, &mut rng);
        pool.activate(2, false, 0.0, &mut rng);
        assert!(pool.expired(5_000.0).is_empty());
        assert_eq!(pool.expired(30_000.0), vec![0, 2]);
    }
}
