use crate::error::ResizeError;
use crate::options::Rotation;
use crate::plane::Plane;

/// Rotates `plane` clockwise by `rotation`.
pub(crate) fn rotate(mut plane: Plane, rotation: Rotation) -> Result<Plane, ResizeError> {
    match rotation {
        Rotation::Deg0 => Ok(plane),
        Rotation::Deg180 => {
            flip_top_bottom_in_place(&mut plane);
            mirror_left_right_in_place(&mut plane);
            Ok(plane)
        }
        Rotation::Deg90 | Rotation::Deg270 => rotate_quarter(&plane, rotation == Rotation::Deg90),
    }
}

fn rotate_quarter(src: &Plane, clockwise: bool) -> Result<Plane, ResizeError> {
    let ch = src.channels;
    let (w, h) = (src.width, src.height);
    let mut dst = Plane::new(h, w, ch)?;

    for y in 0..w {
        let row = dst.row_mut(y);
        for x in 0..h {
            let (sx, sy) = if clockwise { (y, h - 1 - x) } else { (w - 1 - y, x) };
            let idx = (sy * w + sx) * ch;
            row[x * ch..(x + 1) * ch].copy_from_slice(&src.data[idx..idx + ch]);
        }
    }
    Ok(dst)
}

fn flip_top_bottom_in_place(plane: &mut Plane) {
    let row_bytes = plane.row_bytes();
    let height = plane.height;
    if row_bytes == 0 || height == 0 {
        return;
    }

    for y in 0..(height / 2) {
        let top = y * row_bytes;
        let bottom = (height - 1 - y) * row_bytes;

        let (head, tail) = plane.data.split_at_mut(bottom);
        head[top..top + row_bytes].swap_with_slice(&mut tail[..row_bytes]);
    }
}

pub(crate) fn mirror_left_right_in_place(plane: &mut Plane) {
    let (width, ch) = (plane.width, plane.channels);
    if width == 0 || plane.height == 0 {
        return;
    }

    for y in 0..plane.height {
        let row = plane.row_mut(y);
        for x in 0..(width / 2) {
            let left = x * ch;
            let right = (width - 1 - x) * ch;
            for c in 0..ch {
                row.swap(left + c, right + c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2, one channel:
    // 1 2 3
    // 4 5 6
    fn sample() -> Plane {
        let mut plane = Plane::new(3, 2, 1).unwrap();
        plane.data.copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        plane
    }

    #[test]
    fn quarter_turn_clockwise() {
        let out = rotate(sample(), Rotation::Deg90).unwrap();
        assert_eq!((out.width, out.height), (2, 3));
        assert_eq!(out.data, vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn three_quarter_turn() {
        let out = rotate(sample(), Rotation::Deg270).unwrap();
        assert_eq!((out.width, out.height), (2, 3));
        assert_eq!(out.data, vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn half_turn() {
        let out = rotate(sample(), Rotation::Deg180).unwrap();
        assert_eq!(out.data, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn mirror_keeps_pixels_whole() {
        let mut plane = Plane::new(2, 1, 3).unwrap();
        plane.data.copy_from_slice(&[1, 2, 3, 7, 8, 9]);
        mirror_left_right_in_place(&mut plane);
        assert_eq!(plane.data, vec![7, 8, 9, 1, 2, 3]);
    }

    #[test]
    fn four_quarter_turns_restore() {
        let mut plane = sample();
        for _ in 0..4 {
            plane = rotate(plane, Rotation::Deg90).unwrap();
        }
        assert_eq!(plane, sample());
    }
}
