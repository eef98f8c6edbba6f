//! Barnes-Hut octree over the massive bodies.
//!
//! Nodes live in a flat arena that is cleared and refilled on every
//! `prepare`, so a rebuild reuses the previous allocation. Children always
//! have a larger arena index than their parent, which lets the aggregate
//! pass run as a single reverse sweep instead of a recursive walk.
//!
//! Leaves hold one body until `max_depth`, where they start collecting
//! buckets; coincident bodies therefore never recurse forever.

use crate::forces::gravity::{softened_acceleration, FieldSource, GravityAlgorithm, GravityCalculator};
use crate::math::{Aabb, Vector3};

const NONE: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct Node {
    /// Cubic cell
    bounds: Aabb,

    /// Cell edge length
    size: f64,

    parent: u32,
    depth: u32,
    children: [u32; 8],
    is_leaf: bool,

    /// First body of the leaf bucket, chained through `BarnesHutGravity::next`
    head: u32,
    count: u32,

    mass: f64,
    mu: f64,
    com: Vector3,

    /// Mass-weighted mean of the squared softening of the subtree
    eps2: f64,
}

impl Node {
    fn new(bounds: Aabb, parent: u32, depth: u32) -> Self {
        Self {
            size: bounds.extents().x,
            bounds,
            parent,
            depth,
            children: [NONE; 8],
            is_leaf: true,
            head: NONE,
            count: 0,
            mass: 0.0,
            mu: 0.0,
            com: Vector3::ZERO,
            eps2: 0.0,
        }
    }
}

/// Hierarchical gravity with opening angle `theta`
///
/// A cell of edge `s` whose center of mass is at distance `d` from the query
/// is treated as a point mass when `s / d < theta` and the query lies outside
/// the cell. `theta = 0` opens every cell and reproduces the direct sum.
#[derive(Debug, Clone)]
pub struct BarnesHutGravity {
    theta: f64,
    max_depth: u32,
    nodes: Vec<Node>,
    sources: Vec<FieldSource>,

    /// Next body in the same leaf bucket
    next: Vec<u32>,

    /// Leaf holding each body
    leaf_of: Vec<u32>,
}

impl BarnesHutGravity {
    pub fn new(theta: f64, max_depth: u32) -> Self {
        Self {
            theta,
            max_depth: max_depth.max(1),
            nodes: Vec::new(),
            sources: Vec::new(),
            next: Vec::new(),
            leaf_of: Vec::new(),
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
    }

    /// Number of nodes in the current tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total mass and center of mass held by the root, if any
    pub fn root_aggregate(&self) -> Option<(f64, Vector3)> {
        self.nodes.first().map(|root| (root.mass, root.com))
    }

    fn push_node(&mut self, bounds: Aabb, parent: u32, depth: u32) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node::new(bounds, parent, depth));
        index
    }

    fn attach(&mut self, node: u32, body: u32) {
        let leaf = &mut self.nodes[node as usize];
        self.next[body as usize] = leaf.head;
        leaf.head = body;
        leaf.count += 1;
        self.leaf_of[body as usize] = node;
    }

    /// Child of `node` in `octant`, created on first use
    fn child(&mut self, node: u32, octant: usize) -> u32 {
        let existing = self.nodes[node as usize].children[octant];
        if existing != NONE {
            return existing;
        }

        let parent = &self.nodes[node as usize];
        let bounds = parent.bounds.octant(octant);
        let depth = parent.depth + 1;
        let child = self.push_node(bounds, node, depth);
        self.nodes[node as usize].children[octant] = child;
        child
    }

    fn insert(&mut self, body: u32) {
        let position = self.sources[body as usize].position;
        let mut node = 0u32;

        loop {
            let current = &self.nodes[node as usize];

            if current.is_leaf {
                if current.count == 0 || current.depth >= self.max_depth {
                    self.attach(node, body);
                    return;
                }

                // Below max depth a non-empty leaf holds exactly one body
                let resident = current.head;
                let resident_position = self.sources[resident as usize].position;
                let octant = current.bounds.octant_of(&resident_position);

                let split = &mut self.nodes[node as usize];
                split.is_leaf = false;
                split.head = NONE;
                split.count = 0;

                let child = self.child(node, octant);
                self.attach(child, resident);
                continue;
            }

            let octant = current.bounds.octant_of(&position);
            node = self.child(node, octant);
        }
    }

    /// Bottom-up mass, center of mass and softening
    fn aggregate(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let mut mass = 0.0;
            let mut mu = 0.0;
            let mut weighted = Vector3::ZERO;
            let mut eps2 = 0.0;

            if self.nodes[index].is_leaf {
                let mut body = self.nodes[index].head;
                while body != NONE {
                    let source = &self.sources[body as usize];
                    mass += source.mass;
                    mu += source.mu;
                    weighted += source.position * source.mass;
                    eps2 += source.softening * source.softening * source.mass;
                    body = self.next[body as usize];
                }
            } else {
                for &child in &self.nodes[index].children {
                    if child == NONE {
                        continue;
                    }
                    let child = &self.nodes[child as usize];
                    mass += child.mass;
                    mu += child.mu;
                    weighted += child.com * child.mass;
                    eps2 += child.eps2 * child.mass;
                }
            }

            let node = &mut self.nodes[index];
            node.mass = mass;
            node.mu = mu;
            if mass > 0.0 {
                node.com = weighted / mass;
                node.eps2 = eps2 / mass;
            } else {
                node.com = node.bounds.center();
                node.eps2 = 0.0;
            }
        }
    }

    /// Whether `node` lies on the path from the root to `leaf`
    fn is_ancestor(&self, node: u32, mut leaf: u32) -> bool {
        let depth = self.nodes[node as usize].depth;
        while leaf != NONE && self.nodes[leaf as usize].depth > depth {
            leaf = self.nodes[leaf as usize].parent;
        }
        leaf == node
    }

    fn walk(&self, node: u32, position: &Vector3, exclude: Option<u32>, acc: &mut Vector3) {
        let current = &self.nodes[node as usize];
        if current.mass <= 0.0 {
            return;
        }

        if current.is_leaf {
            let mut body = current.head;
            while body != NONE {
                if Some(body) != exclude {
                    let source = &self.sources[body as usize];
                    *acc += softened_acceleration(
                        position,
                        &source.position,
                        source.mu,
                        source.softening * source.softening,
                    );
                }
                body = self.next[body as usize];
            }
            return;
        }

        let distance = current.com.distance(position);
        let holds_excluded = exclude
            .map(|body| self.is_ancestor(node, self.leaf_of[body as usize]))
            .unwrap_or(false);
        let far = current.size < self.theta * distance;

        if far && !holds_excluded && !current.bounds.contains_point(*position) {
            *acc += softened_acceleration(position, &current.com, current.mu, current.eps2);
            return;
        }

        for &child in &current.children {
            if child != NONE {
                self.walk(child, position, exclude, acc);
            }
        }
    }
}

impl Default for BarnesHutGravity {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_THETA, 16)
    }
}

impl GravityCalculator for BarnesHutGravity {
    fn algorithm(&self) -> GravityAlgorithm {
        GravityAlgorithm::BarnesHut
    }

    fn prepare(&mut self, sources: &[FieldSource]) {
        self.nodes.clear();
        self.sources.clear();
        self.sources.extend_from_slice(sources);
        self.next.clear();
        self.next.resize(sources.len(), NONE);
        self.leaf_of.clear();
        self.leaf_of.resize(sources.len(), NONE);

        let bounds = match Aabb::from_points(sources.iter().map(|s| s.position)) {
            Some(bounds) => bounds.bounding_cube(),
            None => return,
        };
        self.push_node(bounds, NONE, 0);

        for body in 0..sources.len() as u32 {
            self.insert(body);
        }

        self.aggregate();
    }

    fn acceleration_at(&self, position: &Vector3, exclude: Option<usize>) -> Vector3 {
        let mut acc = Vector3::ZERO;
        if !self.nodes.is_empty() {
            let exclude = exclude
                .filter(|&index| index < self.sources.len())
                .map(|index| index as u32);
            self.walk(0, position, exclude, &mut acc);
        }
        acc
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}
