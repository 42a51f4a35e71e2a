use gesture_base::Tensor;
use gesture_image::{ImageError, decode_rgb, encode_jpeg, flip_horizontal, guess_format, resize_to_height};

fn gradient(width: usize, height: usize) -> Tensor<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, 128]);
        }
    }
    Tensor::new(vec![height, width, 3], data).unwrap()
}

#[test]
fn test_jpeg_encode_then_decode_keeps_dimensions() {
    let frame = gradient(32, 16);
    let jpeg = encode_jpeg(&frame, 90).unwrap();
    assert_eq!(guess_format(&jpeg), Some("jpeg"));

    let decoded = decode_rgb(&jpeg).unwrap();
    assert_eq!(decoded.shape, vec![16, 32, 3]);
}

#[test]
fn test_decode_rejects_garbage() {
    let result = decode_rgb(b"definitely not an image");
    assert!(matches!(result, Err(ImageError::Decode(_))));
}

#[test]
fn test_flip_horizontal_mirrors_rows() {
    let frame = Tensor::new(vec![1, 3, 1], vec![1u8, 2, 3]).unwrap();
    let flipped = flip_horizontal(&frame).unwrap();
    assert_eq!(flipped.data, vec![3, 2, 1]);

    let rgb = Tensor::new(vec![1, 2, 3], vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(flip_horizontal(&rgb).unwrap().data, vec![4, 5, 6, 1, 2, 3]);
}

#[test]
fn test_flip_twice_is_identity() {
    let frame = gradient(7, 5);
    let twice = flip_horizontal(&flip_horizontal(&frame).unwrap()).unwrap();
    assert_eq!(twice, frame);
}

#[test]
fn test_resize_to_height_keeps_aspect() {
    let frame = gradient(64, 48);
    let resized = resize_to_height(&frame, 24).unwrap();
    assert_eq!(resized.shape, vec![24, 32, 3]);
}

#[test]
fn test_encode_rejects_non_rgb() {
    let gray = Tensor::new(vec![2, 2, 1], vec![0u8; 4]).unwrap();
    assert!(matches!(encode_jpeg(&gray, 80), Err(ImageError::UnsupportedChannels(1))));
}
