use glam::Vec3;
use rand::Rng;

use crate::color::{pick_particle_color, Rgb};

/// Role decides how a particle is drawn. Fixed per index at creation.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Ornamental = 0, // Instanced 3D blob with breathing scale
    Carrier    = 1, // Flat food-icon billboard
}

/// SoA particle storage. Index is identity for the whole session.
pub struct ParticleSet {
    pub count: usize,
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    pub role: Vec<Role>,
    /// Per-particle color, drawn once. Carriers keep white (their sprite has its own colors).
    pub color: Vec<Rgb>,
    /// Index into the host's icon list for carriers, `None` for ornamentals.
    pub icon: Vec<Option<usize>>,
}

impl ParticleSet {
    pub fn new(count: usize, carrier_stride: usize) -> Self {
        let stride = carrier_stride.max(1);
        Self {
            count,
            position: vec![Vec3::ZERO; count],
            velocity: vec![Vec3::ZERO; count],
            role: (0..count).map(|i| role_for(i, stride)).collect(),
            color: vec![Rgb::WHITE; count],
            icon: vec![None; count],
        }
    }

    /// Assign palette colors to ornamentals and icon slots to carriers.
    pub fn paint<R: Rng + ?Sized>(&mut self, palette: &[Rgb], icon_count: usize, rng: &mut R) {
        for i in 0..self.count {
            match self.role[i] {
                Role::Ornamental => {
                    self.color[i] = pick_particle_color(palette, rng);
                }
                Role::Carrier => {
                    self.icon[i] = (icon_count > 0).then(|| rng.gen_range(0..icon_count));
                }
            }
        }
    }

    /// Teleport every particle onto `targets` and zero velocities.
    pub fn place(&mut self, targets: &[Vec3]) {
        for (pos, target) in self.position.iter_mut().zip(targets) {
            *pos = *target;
        }
        self.velocity.iter_mut().for_each(|v| *v = Vec3::ZERO);
    }

    pub fn carriers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter(move |&i| self.role[i] == Role::Carrier)
    }
}

#[inline]
pub fn role_for(index: usize, carrier_stride: usize) -> Role {
    if index % carrier_stride == 0 {
        Role::Carrier
    } else {
        Role::Ornamental
    }
}
