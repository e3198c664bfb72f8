//! Alignment and distribution of a multi-selection.
//!
//! Computes target boxes only; the session writes them through the element
//! adapters as a single gesture group.

use std::fmt;
use std::str::FromStr;

use figkit_core::Bbox;

/// Alignment action on the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Left edges to the leftmost left edge
    LeftX,
    /// Horizontal centers to their mean
    CenterX,
    /// Right edges to the rightmost right edge
    RightX,
    /// Horizontal centers evenly spaced between the outermost two
    DistributeX,
    /// Top edges to the highest top edge
    TopY,
    CenterY,
    /// Bottom edges to the lowest bottom edge
    BottomY,
    DistributeY,
    /// Common size on a regular grid
    Group,
}

impl Alignment {
    pub const ALL: [Alignment; 9] = [
        Alignment::LeftX,
        Alignment::CenterX,
        Alignment::RightX,
        Alignment::DistributeX,
        Alignment::TopY,
        Alignment::CenterY,
        Alignment::BottomY,
        Alignment::DistributeY,
        Alignment::Group,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::LeftX => "left_x",
            Alignment::CenterX => "center_x",
            Alignment::RightX => "right_x",
            Alignment::DistributeX => "distribute_x",
            Alignment::TopY => "top_y",
            Alignment::CenterY => "center_y",
            Alignment::BottomY => "bottom_y",
            Alignment::DistributeY => "distribute_y",
            Alignment::Group => "group",
        }
    }

    /// History label.
    pub fn label(self) -> &'static str {
        match self {
            Alignment::LeftX => "Align left",
            Alignment::CenterX => "Align horizontal centers",
            Alignment::RightX => "Align right",
            Alignment::DistributeX => "Distribute horizontally",
            Alignment::TopY => "Align top",
            Alignment::CenterY => "Align vertical centers",
            Alignment::BottomY => "Align bottom",
            Alignment::DistributeY => "Distribute vertically",
            Alignment::Group => "Arrange on grid",
        }
    }

    /// Whether the action changes extents, not only positions.
    pub fn resizes(self) -> bool {
        self == Alignment::Group
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alignment::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown alignment '{}'", s))
    }
}

/// Target boxes for `boxes`, in the same order.
///
/// An empty input gives an empty output. A single box is left in place by
/// every action.
pub fn align(alignment: Alignment, boxes: &[Bbox]) -> Vec<Bbox> {
    if boxes.len() < 2 {
        return boxes.to_vec();
    }
    let n = boxes.len() as f64;
    match alignment {
        Alignment::LeftX => {
            let target = boxes.iter().map(|b| b.x0).fold(f64::INFINITY, f64::min);
            boxes.iter().map(|b| with_x0(b, target)).collect()
        }
        Alignment::RightX => {
            let target = boxes.iter().map(|b| b.x1()).fold(f64::NEG_INFINITY, f64::max);
            boxes.iter().map(|b| with_x0(b, target - b.width)).collect()
        }
        Alignment::CenterX => {
            let target = boxes.iter().map(|b| b.center().x).sum::<f64>() / n;
            boxes.iter().map(|b| with_x0(b, target - b.width / 2.0)).collect()
        }
        Alignment::BottomY => {
            let target = boxes.iter().map(|b| b.y0).fold(f64::INFINITY, f64::min);
            boxes.iter().map(|b| with_y0(b, target)).collect()
        }
        Alignment::TopY => {
            let target = boxes.iter().map(|b| b.y1()).fold(f64::NEG_INFINITY, f64::max);
            boxes.iter().map(|b| with_y0(b, target - b.height)).collect()
        }
        Alignment::CenterY => {
            let target = boxes.iter().map(|b| b.center().y).sum::<f64>() / n;
            boxes.iter().map(|b| with_y0(b, target - b.height / 2.0)).collect()
        }
        Alignment::DistributeX => {
            let centers = distribute(boxes.iter().map(|b| b.center().x).collect());
            boxes
                .iter()
                .zip(centers)
                .map(|(b, c)| with_x0(b, c - b.width / 2.0))
                .collect()
        }
        Alignment::DistributeY => {
            let centers = distribute(boxes.iter().map(|b| b.center().y).collect());
            boxes
                .iter()
                .zip(centers)
                .map(|(b, c)| with_y0(b, c - b.height / 2.0))
                .collect()
        }
        Alignment::Group => grid(boxes),
    }
}

fn with_x0(b: &Bbox, x0: f64) -> Bbox {
    Bbox::new(x0, b.y0, b.width, b.height)
}

fn with_y0(b: &Bbox, y0: f64) -> Bbox {
    Bbox::new(b.x0, y0, b.width, b.height)
}

/// Evenly spaced values between the smallest and largest, assigned in the
/// order of the input values.
fn distribute(values: Vec<f64>) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let min = values[order[0]];
    let max = values[order[order.len() - 1]];
    let step = (max - min) / (values.len() - 1) as f64;

    let mut out = values.clone();
    for (rank, &index) in order.iter().enumerate() {
        out[index] = min + rank as f64 * step;
    }
    out
}

/// Rank of each value after grouping values closer than `threshold` into
/// one grid line.
fn grid_lines(values: &[f64], threshold: f64) -> Vec<usize> {
    let mut lines: Vec<f64> = Vec::new();
    let mut assigned = Vec::with_capacity(values.len());
    for &v in values {
        let nearest = lines
            .iter()
            .enumerate()
            .map(|(i, line)| (i, (line - v).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((i, d)) if d <= threshold => assigned.push(i),
            _ => {
                lines.push(v);
                assigned.push(lines.len() - 1);
            }
        }
    }

    let mut order: Vec<usize> = (0..lines.len()).collect();
    order.sort_by(|&a, &b| lines[a].total_cmp(&lines[b]));
    let mut rank = vec![0; lines.len()];
    for (r, &line) in order.iter().enumerate() {
        rank[line] = r;
    }
    assigned.into_iter().map(|line| rank[line]).collect()
}

/// Regular grid over the area the boxes cover, every cell the mean size.
fn grid(boxes: &[Bbox]) -> Vec<Bbox> {
    let n = boxes.len() as f64;
    let width = boxes.iter().map(|b| b.width).sum::<f64>() / n;
    let height = boxes.iter().map(|b| b.height).sum::<f64>() / n;

    let centers_x: Vec<f64> = boxes.iter().map(|b| b.center().x).collect();
    let centers_y: Vec<f64> = boxes.iter().map(|b| b.center().y).collect();
    let cols = grid_lines(&centers_x, width / 2.0);
    let rows = grid_lines(&centers_y, height / 2.0);

    let Some(area) = Bbox::union_all(boxes.iter()) else {
        return Vec::new();
    };
    let gap = |count: usize, span: f64, size: f64| {
        if count == 0 {
            0.0
        } else {
            (span - (count + 1) as f64 * size) / count as f64
        }
    };
    let x_count = cols.iter().copied().max().unwrap_or(0);
    let y_count = rows.iter().copied().max().unwrap_or(0);
    let x_gap = gap(x_count, area.width, width);
    let y_gap = gap(y_count, area.height, height);

    cols.iter()
        .zip(&rows)
        .map(|(&col, &row)| {
            Bbox::new(
                area.x0 + col as f64 * (width + x_gap),
                area.y0 + row as f64 * (height + y_gap),
                width,
                height,
            )
        })
        .collect()
}
