/// Axis-aligned overlap test used for projectile hits.

use crate::entities::Rect;

/// True when both intervals overlap. Touching edges do not count.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edge_is_not_a_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(a, b));
        assert!(!overlaps(b, a));
    }

    #[test]
    fn contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlaps(outer, inner));
        assert!(overlaps(inner, outer));
    }

    #[test]
    fn stacked_rects_sharing_an_edge_do_not_hit() {
        let top = Rect::new(0.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(top, below));
        assert!(!overlaps(below, top));
    }

    #[test]
    fn partial_overlap_hits_from_either_side() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        for b in [
            Rect::new(9.5, 0.0, 10.0, 10.0),
            Rect::new(0.0, 9.5, 10.0, 10.0),
            Rect::new(-5.0, -5.0, 10.0, 10.0),
            Rect::new(5.0, -3.0, 2.0, 20.0),
        ] {
            assert!(overlaps(a, b), "{b:?}");
            assert!(overlaps(b, a), "{b:?}");
        }
    }

    #[test]
    fn separated_rects_miss_from_either_side() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        for b in [
            Rect::new(10.5, 0.0, 10.0, 10.0),
            Rect::new(0.0, -10.0, 10.0, 10.0),
            Rect::new(-10.0, 5.0, 10.0, 10.0),
            Rect::new(10.0, 10.0, 5.0, 5.0),
            Rect::new(20.0, 20.0, 5.0, 5.0),
        ] {
            assert!(!overlaps(a, b), "{b:?}");
            assert!(!overlaps(b, a), "{b:?}");
        }
    }
}
