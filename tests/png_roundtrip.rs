use vatbake::png::{encode, RgbGrid};

/// Decode the hand-assembled PNG with an independent reader and make
/// sure every pixel survives.
#[test]
fn independent_decoder_recovers_every_pixel() {
    let mut grid = RgbGrid::new(3, 2).unwrap();
    let pixels: [[u8; 3]; 6] = [
        [0, 0, 0],
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [12, 34, 56],
        [255, 255, 255],
    ];
    for (i, rgb) in pixels.iter().enumerate() {
        grid.put((i % 3) as u32, (i / 3) as u32, *rgb);
    }

    let bytes = encode(&grid).unwrap();
    let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .unwrap()
        .to_rgb8();

    assert_eq!(img.dimensions(), (3, 2));
    for (i, rgb) in pixels.iter().enumerate() {
        let got = img.get_pixel((i % 3) as u32, (i / 3) as u32).0;
        assert_eq!(&got, rgb, "pixel {i}");
    }
}

#[test]
fn single_pixel_texture_decodes() {
    let mut grid = RgbGrid::new(1, 1).unwrap();
    grid.put(0, 0, [200, 100, 50]);
    let bytes = encode(&grid).unwrap();
    let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .unwrap()
        .to_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, [200, 100, 50]);
}
