//! Geometric node placement for the terminal
//!
//! Computes positions in layout units for each layout kind. The canvas
//! scales whatever comes out of here to the available cells, so only the
//! relative geometry matters.

use std::collections::{HashMap, VecDeque};
use std::f32::consts::TAU;

use dtugraph_core::render::{LayoutPositions, Position, RelayoutRequest};
use dtugraph_core::view::{AlgorithmParams, HierarchyDirection, VisibleSubset};

/// Force iterations are capped; the terminal can't show finer detail
const MAX_FORCE_ITERATIONS: u32 = 300;

/// Compute positions for every node in the request
pub fn place(request: &RelayoutRequest) -> LayoutPositions {
    let visible = request.visible.as_ref();
    let ids: Vec<&str> = visible.node_ids().collect();
    let ranks: Vec<u8> = request.node_visuals.iter().map(|v| v.rank).collect();
    let spacing = request.node_visuals.iter().map(|v| v.size).fold(28.0, f32::max)
        + request.params.padding as f32;

    let points = match &request.params.algorithm {
        AlgorithmParams::Circle {
            start_angle,
            clockwise,
        } => ring(ids.len(), spacing, *start_angle, *clockwise),
        AlgorithmParams::Grid { .. } => grid(ids.len(), spacing),
        AlgorithmParams::Concentric {
            min_node_spacing,
            levels,
            ..
        } => concentric(&ranks, spacing + min_node_spacing, *levels),
        AlgorithmParams::Hierarchy {
            direction,
            level_separation,
            node_separation,
        } => hierarchy(
            visible,
            &ranks,
            spacing + level_separation,
            spacing.max(*node_separation),
            *direction,
        ),
        AlgorithmParams::Force {
            ideal_edge_length,
            iterations,
            seed,
            ..
        } => force(
            visible,
            spacing,
            ideal_edge_length.max(spacing),
            (*iterations).min(MAX_FORCE_ITERATIONS),
            *seed,
        ),
    };

    let mut positions = LayoutPositions::new(request.params.kind);
    for (id, point) in ids.into_iter().zip(points) {
        positions.insert(id, point);
    }
    positions
}

/// Evenly spaced points on a circle sized so neighbors are `spacing` apart
fn ring(count: usize, spacing: f32, start_angle: f32, clockwise: bool) -> Vec<Position> {
    if count == 1 {
        return vec![Position::default()];
    }
    let radius = spacing * count as f32 / TAU;
    let step = if clockwise { -TAU } else { TAU } / count as f32;
    (0..count)
        .map(|i| {
            let angle = start_angle + step * i as f32;
            Position::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn grid(count: usize, spacing: f32) -> Vec<Position> {
    let columns = (count as f32).sqrt().ceil().max(1.0) as usize;
    (0..count)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            Position::new(col as f32 * spacing, -(row as f32) * spacing)
        })
        .collect()
}

/// Rings by rank; the highest rank sits innermost
fn concentric(ranks: &[u8], ring_gap: f32, levels: u8) -> Vec<Position> {
    let top = levels.saturating_sub(1);
    let ring_of = |rank: u8| (top.saturating_sub(rank.min(top))) as usize;

    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, rank) in ranks.iter().enumerate() {
        members.entry(ring_of(*rank)).or_default().push(i);
    }

    let mut points = vec![Position::default(); ranks.len()];
    for (ring_index, indices) in members {
        let radius = if ring_index == 0 && indices.len() == 1 {
            0.0
        } else {
            ring_gap * (ring_index as f32 + 1.0)
        };
        let step = TAU / indices.len() as f32;
        for (k, i) in indices.into_iter().enumerate() {
            let angle = -std::f32::consts::FRAC_PI_2 + step * k as f32;
            points[i] = Position::new(radius * angle.cos(), radius * angle.sin());
        }
    }
    points
}

/// Breadth-first levels starting from the highest-ranked unvisited node
fn hierarchy(
    visible: &VisibleSubset,
    ranks: &[u8],
    level_gap: f32,
    sibling_gap: f32,
    direction: HierarchyDirection,
) -> Vec<Position> {
    let ids: Vec<&str> = visible.node_ids().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for edge in visible.edges() {
        if let (Some(&a), Some(&b)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            if a != b {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
    }

    let mut roots: Vec<usize> = (0..ids.len()).collect();
    roots.sort_by(|a, b| ranks[*b].cmp(&ranks[*a]).then(a.cmp(b)));

    let mut depth: Vec<Option<usize>> = vec![None; ids.len()];
    let mut base_level = 0;
    for root in roots {
        if depth[root].is_some() {
            continue;
        }
        depth[root] = Some(base_level);
        let mut deepest = base_level;
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            let next = depth[current].unwrap_or(base_level) + 1;
            for &neighbor in &adjacency[current] {
                if depth[neighbor].is_none() {
                    depth[neighbor] = Some(next);
                    deepest = deepest.max(next);
                    queue.push_back(neighbor);
                }
            }
        }
        // Disconnected components stack below the previous one
        base_level = deepest + 1;
    }

    let mut levels: Vec<Vec<usize>> = Vec::new();
    for (i, d) in depth.iter().enumerate() {
        let d = d.unwrap_or(0);
        if levels.len() <= d {
            levels.resize(d + 1, Vec::new());
        }
        levels[d].push(i);
    }

    let mut points = vec![Position::default(); ids.len()];
    for (level, members) in levels.iter().enumerate() {
        let width = (members.len().saturating_sub(1)) as f32 * sibling_gap;
        for (k, &i) in members.iter().enumerate() {
            let across = k as f32 * sibling_gap - width / 2.0;
            let down = -(level as f32) * level_gap;
            points[i] = match direction {
                HierarchyDirection::TopDown => Position::new(across, down),
                HierarchyDirection::LeftRight => Position::new(-down, -across),
            };
        }
    }
    points
}

/// Spring embedder seeded from a rotated ring
fn force(
    visible: &VisibleSubset,
    spacing: f32,
    ideal_length: f32,
    iterations: u32,
    seed: u64,
) -> Vec<Position> {
    let count = visible.node_count();
    let offset = (seed % 360) as f32 * TAU / 360.0;
    let mut points = ring(count, spacing, offset, false);
    if count < 2 {
        return points;
    }

    let ids: Vec<&str> = visible.node_ids().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let edges: Vec<(usize, usize)> = visible
        .edges()
        .iter()
        .filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
        .filter(|(a, b)| a != b)
        .collect();

    let repulsion = ideal_length * ideal_length;
    let mut temperature = spacing * 2.0;
    let cooling = temperature / (iterations.max(1) as f32 + 1.0);

    for _ in 0..iterations {
        let mut forces = vec![(0.0f32, 0.0f32); count];

        for i in 0..count {
            for j in (i + 1)..count {
                let dx = points[j].x - points[i].x;
                let dy = points[j].y - points[i].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1.0);
                let push = repulsion / dist;
                let (fx, fy) = (dx / dist * push, dy / dist * push);
                forces[i].0 -= fx;
                forces[i].1 -= fy;
                forces[j].0 += fx;
                forces[j].1 += fy;
            }
        }

        for &(a, b) in &edges {
            let dx = points[b].x - points[a].x;
            let dy = points[b].y - points[a].y;
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);
            let pull = dist * dist / ideal_length;
            let (fx, fy) = (dx / dist * pull, dy / dist * pull);
            forces[a].0 += fx;
            forces[a].1 += fy;
            forces[b].0 -= fx;
            forces[b].1 -= fy;
        }

        for (point, (fx, fy)) in points.iter_mut().zip(forces) {
            let magnitude = (fx * fx + fy * fy).sqrt().max(f32::EPSILON);
            let step = magnitude.min(temperature);
            point.x += fx / magnitude * step;
            point.y += fy / magnitude * step;
        }
        temperature = (temperature - cooling).max(1.0);
    }

    points
}
