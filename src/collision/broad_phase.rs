use crate::math::Aabb;

/// Trait for broad-phase collision detection algorithms
///
/// Proxies are addressed by their index in the slice given to `update`.
pub trait BroadPhase: Send + Sync {
    /// Replaces the proxies with the current bounding boxes
    fn update(&mut self, proxies: &[Aabb]);

    /// Gets all overlapping proxy pairs as `(lower, higher)` indices, sorted
    fn get_collision_pairs(&self) -> Vec<(usize, usize)>;
}

/// Simple brute-force broad-phase algorithm
#[derive(Debug, Clone, Default)]
pub struct BruteForceBroadPhase {
    proxies: Vec<Aabb>,
}

impl BruteForceBroadPhase {
    /// Creates a new brute-force broad-phase
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for BruteForceBroadPhase {
    fn update(&mut self, proxies: &[Aabb]) {
        self.proxies.clear();
        self.proxies.extend_from_slice(proxies);
    }

    fn get_collision_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        // Check all pairs of proxies
        for i in 0..self.proxies.len() {
            for j in (i + 1)..self.proxies.len() {
                if self.proxies[i].intersects(&self.proxies[j]) {
                    pairs.push((i, j));
                }
            }
        }

        pairs
    }
}

/// Sort-and-sweep along the x axis
///
/// Proxies are sorted by their minimum x each update; only proxies whose x
/// intervals overlap are tested on the remaining axes.
#[derive(Debug, Clone, Default)]
pub struct SweepAndPrune {
    proxies: Vec<Aabb>,
    order: Vec<usize>,
}

impl SweepAndPrune {
    /// Creates a new sweep-and-prune broad-phase
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for SweepAndPrune {
    fn update(&mut self, proxies: &[Aabb]) {
        self.proxies.clear();
        self.proxies.extend_from_slice(proxies);

        self.order.clear();
        self.order.extend(0..proxies.len());
        let proxies = &self.proxies;
        // Stable sort keeps equal keys in index order
        self.order
            .sort_by(|&a, &b| proxies[a].min.x.total_cmp(&proxies[b].min.x));
    }

    fn get_collision_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for (position, &i) in self.order.iter().enumerate() {
            let aabb_i = &self.proxies[i];

            for &j in &self.order[position + 1..] {
                let aabb_j = &self.proxies[j];
                if aabb_j.min.x > aabb_i.max.x {
                    break;
                }
                if aabb_i.intersects(aabb_j) {
                    pairs.push((i.min(j), i.max(j)));
                }
            }
        }

        pairs.sort_unstable();
        pairs
    }
}
