use frame_resizer::{
    Algorithm, Crop, DataType, FrameBuffer, FrameResizer, PixelFormat, Rect, Resize,
    ResizeError, ResizeOptions, ResizeRequest, Rotation,
};

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn rgba(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> FrameBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    FrameBuffer::packed(width, height, PixelFormat::Rgba, data).unwrap()
}

fn gradient(width: u32, height: u32) -> FrameBuffer {
    rgba(width, height, |x, y| {
        [(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8, 255]
    })
}

fn convert(frame: &FrameBuffer, format: PixelFormat) -> FrameBuffer {
    let request = ResizeRequest::scale(frame.as_frame_ref(), frame.width(), frame.height(), format);
    FrameResizer.resize(&request).unwrap()
}

fn resize(frame: &FrameBuffer, options: ResizeOptions) -> Result<FrameBuffer, ResizeError> {
    FrameResizer.resize(&ResizeRequest::new(frame.as_frame_ref(), options))
}

fn pixel(frame: &FrameBuffer, x: u32, y: u32) -> &[u8] {
    let ch = frame.format().channels();
    let start = y as usize * frame.stride() + x as usize * ch;
    &frame.data()[start..start + ch]
}

#[test]
fn output_dimensions_match_target() {
    let source = gradient(7, 5);
    for format in PixelFormat::ALL {
        for (w, h) in [(1, 1), (3, 9), (14, 10), (7, 5), (2, 1)] {
            for algorithm in [Algorithm::Nearest, Algorithm::Bilinear] {
                let mut opts = ResizeOptions::new(w, h, format);
                opts.algorithm = algorithm;
                let out = resize(&source, opts).unwrap();
                assert_eq!((out.width(), out.height()), (w, h), "{format} {algorithm:?}");
                assert_eq!(out.format(), format);
                assert!(out.data().len() >= format.required_len(out.stride(), h).unwrap());
            }
        }
    }
}

#[test]
fn same_size_same_format_is_bit_exact() {
    for (w, h) in [(6, 4), (5, 3)] {
        let base = gradient(w, h);
        for format in PixelFormat::ALL {
            let source = convert(&base, format);
            for algorithm in [Algorithm::Nearest, Algorithm::Bilinear] {
                let mut opts = ResizeOptions::new(w, h, format);
                opts.algorithm = algorithm;
                let out = resize(&source, opts).unwrap();
                assert_eq!(out, source, "{format} {w}x{h} {algorithm:?}");
            }
        }
    }
}

#[test]
fn down_then_up_stays_close() {
    let source = gradient(16, 16);
    let small = resize(&source, ResizeOptions::new(8, 8, PixelFormat::Rgba)).unwrap();
    let back = resize(&small, ResizeOptions::new(16, 16, PixelFormat::Rgba)).unwrap();

    let diffs: Vec<u32> = source
        .data()
        .iter()
        .zip(back.data())
        .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs())
        .collect();
    let max = diffs.iter().copied().max().unwrap();
    let mean = diffs.iter().sum::<u32>() as f64 / diffs.len() as f64;
    assert!(max <= 12, "max error {max}");
    assert!(mean <= 3.0, "mean error {mean}");
}

#[test]
fn zero_target_dimensions_are_invalid() {
    let source = gradient(4, 4);
    for format in PixelFormat::ALL {
        for (w, h) in [(0, 2), (2, 0), (0, 0)] {
            let err = resize(&source, ResizeOptions::new(w, h, format)).unwrap_err();
            assert!(matches!(err, ResizeError::InvalidInput(_)));
            assert!(!err.is_retryable());
        }
    }
}

#[test]
fn unreservable_target_is_an_allocation_error() {
    let source = rgba(2, 2, |_, _| WHITE);
    for algorithm in [Algorithm::Nearest, Algorithm::Bilinear] {
        let mut opts = ResizeOptions::new(u32::MAX, u32::MAX, PixelFormat::Rgba);
        opts.algorithm = algorithm;
        let err = resize(&source, opts).unwrap_err();
        assert!(matches!(err, ResizeError::Allocation(_)), "{algorithm:?}: {err:?}");
        assert!(err.is_retryable());
    }
}

#[test]
fn white_four_by_four_halves_to_white() {
    let source = rgba(4, 4, |_, _| WHITE);
    for algorithm in [Algorithm::Nearest, Algorithm::Bilinear] {
        let mut opts = ResizeOptions::new(2, 2, PixelFormat::Rgba);
        opts.algorithm = algorithm;
        let out = resize(&source, opts).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
        assert_eq!(out.data(), &[255u8; 16]);
    }
}

#[test]
fn checkerboard_upscale_blends_midpoints() {
    let source = rgba(2, 2, |x, y| if (x + y) % 2 == 0 { [0, 0, 0, 255] } else { WHITE });
    let out = resize(&source, ResizeOptions::new(4, 4, PixelFormat::Rgba)).unwrap();

    // corners still map onto the original pixels
    assert_eq!(pixel(&out, 0, 0), &[0, 0, 0, 255]);
    assert_eq!(pixel(&out, 3, 0), &WHITE);
    assert_eq!(pixel(&out, 0, 3), &WHITE);
    assert_eq!(pixel(&out, 3, 3), &[0, 0, 0, 255]);

    for (x, y) in [(1, 0), (2, 0), (1, 1), (2, 1), (1, 2), (2, 2), (0, 1), (3, 2)] {
        let v = pixel(&out, x, y)[0];
        assert!(v > 0 && v < 255, "({x}, {y}) is {v}, expected gray");
        assert_eq!(pixel(&out, x, y)[3], 255);
    }
}

#[test]
fn white_survives_yuv_paths() {
    let source = rgba(6, 4, |_, _| WHITE);
    for format in [PixelFormat::Nv12, PixelFormat::Yuv420] {
        let yuv = resize(&source, ResizeOptions::new(3, 2, format)).unwrap();
        let back = resize(&yuv, ResizeOptions::new(3, 2, PixelFormat::Rgb)).unwrap();
        assert_eq!(back.data(), &[255u8; 18], "{format}");
    }
}

#[test]
fn rotation_and_mirror_move_pixels() {
    let red = [255, 0, 0, 255];
    let blue = [0, 0, 255, 255];
    // red on the left, blue on the right
    let source = rgba(2, 1, |x, _| if x == 0 { red } else { blue });

    let mut opts = ResizeOptions::new(1, 2, PixelFormat::Rgba);
    opts.rotation = Rotation::Deg90;
    let out = resize(&source, opts).unwrap();
    assert_eq!(out.data(), [red, blue].concat());

    opts.rotation = Rotation::Deg270;
    let out = resize(&source, opts).unwrap();
    assert_eq!(out.data(), [blue, red].concat());

    let mut opts = ResizeOptions::new(2, 1, PixelFormat::Rgba);
    opts.mirror = true;
    let out = resize(&source, opts).unwrap();
    assert_eq!(out.data(), [blue, red].concat());
}

#[test]
fn crops_before_scaling() {
    let source = gradient(8, 4);
    let mut opts = ResizeOptions::new(2, 2, PixelFormat::Rgba);
    opts.crop = Crop::Rect(Rect { x: 4, y: 2, width: 2, height: 2 });
    let out = resize(&source, opts).unwrap();
    assert_eq!(pixel(&out, 0, 0), pixel(&source, 4, 2));
    assert_eq!(pixel(&out, 1, 1), pixel(&source, 5, 3));

    let mut opts = ResizeOptions::new(4, 4, PixelFormat::Rgba);
    opts.crop = Crop::CENTER;
    let out = resize(&source, opts).unwrap();
    assert_eq!(pixel(&out, 0, 0), pixel(&source, 2, 0));
    assert_eq!(pixel(&out, 3, 3), pixel(&source, 5, 3));
}

#[test]
fn float_output_matches_uint8_output() {
    let source = gradient(4, 4);
    let bytes = resize(&source, ResizeOptions::new(3, 3, PixelFormat::Rgb)).unwrap();
    let mut opts = ResizeOptions::new(3, 3, PixelFormat::Rgb);
    opts.data_type = DataType::Float32;
    let floats = resize(&source, opts).unwrap();

    assert_eq!(floats.data_type(), DataType::Float32);
    assert_eq!(floats.stride(), 3 * 3 * 4);
    for (chunk, &b) in floats.data().chunks_exact(4).zip(bytes.data()) {
        let v = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        assert!((v * 255.0 - b as f32).abs() < 1e-3);
    }
}

#[test]
fn padded_source_stride_is_respected() {
    let mut data = vec![0u8; 2 * 16];
    data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    data[16..24].copy_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16]);
    let source = FrameBuffer::new(2, 2, PixelFormat::Rgba, 16, data).unwrap();

    let out = resize(&source, ResizeOptions::new(2, 2, PixelFormat::Rgba)).unwrap();
    assert_eq!(out.stride(), 8);
    assert_eq!(out.data(), (1..=16).collect::<Vec<u8>>());
}

#[test]
fn one_resizer_serves_many_threads() {
    let resizer = FrameResizer::new();
    let frames: Vec<FrameBuffer> = (1..=4).map(|i| gradient(4 * i, 4 * i)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = frames
            .iter()
            .map(|frame| {
                scope.spawn(move || {
                    let request =
                        ResizeRequest::scale(frame.as_frame_ref(), 5, 3, PixelFormat::Bgr);
                    resizer.resize(&request)
                })
            })
            .collect();
        for handle in handles {
            let out = handle.join().unwrap().unwrap();
            assert_eq!((out.width(), out.height()), (5, 3));
        }
    });
}
