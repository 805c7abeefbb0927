use super::{instance::AnimationInstance, skinning::SkinningPalette};
use log::debug;
use parking_lot::Mutex;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Recycles palettes between instances that come and go.
///
/// The free list is wrapped in a `parking_lot::Mutex` and is
/// only locked while a palette is handed out or returned, never while one is
/// being written.
#[derive(Default)]
pub struct PalettePool {
    free: Mutex<Vec<SkinningPalette>>,
}

impl PalettePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a palette from the pool, or creates one if the pool is empty.
    ///
    /// The palette is sized for `bone_count` and in the bind pose.
    #[must_use]
    pub fn acquire(&self, bone_count: usize) -> SkinningPalette {
        let recycled = self.free.lock().pop();
        recycled.map_or_else(
            || {
                debug!("palette pool empty, creating for {bone_count} bones");
                SkinningPalette::new(bone_count)
            },
            |mut palette| {
                palette.resize(bone_count);
                palette
            },
        )
    }

    /// Returns a palette to the pool
    pub fn release(&self, palette: SkinningPalette) {
        self.free.lock().push(palette);
    }

    /// Number of palettes waiting to be reused
    #[must_use]
    pub fn len(&self) -> usize {
        self.free.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.free.lock().is_empty()
    }
}

/// Updates every instance for the current frame.
///
/// Each instance only touches
/// its own palette so with the "rayon" feature they run in parallel.
pub fn update_all(instances: &mut [AnimationInstance]) {
    #[cfg(feature = "rayon")]
    let it = instances.par_iter_mut();
    #[cfg(not(feature = "rayon"))]
    let it = instances.iter_mut();
    it.for_each(|instance| {
        instance.update();
    });
}
