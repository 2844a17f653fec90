//! Image tests against planes produced by the synthetic source.

use plane_store::store::ImageSource;
use plane_store::{Coords, ImageError, Metadata, SyntheticSource};

use super::test_utils::at;

#[tokio::test]
async fn test_copies_share_pixels_but_not_coords() {
    let source = SyntheticSource::new(6, 4);
    let image = source.snap().await.unwrap().into_image(at("z=0")).unwrap();

    let moved = image.copy_at_coords(at("z=1,time=2"));
    assert!(moved.shares_pixels_with(&image));
    assert_eq!(moved.raw_pixels().as_ptr(), image.raw_pixels().as_ptr());
    assert_eq!(moved.coords(), &at("z=1,time=2"));
    assert_eq!(image.coords(), &at("z=0"));

    let relabeled = moved.copy_with_metadata(Metadata::builder().camera("relabel").build());
    assert!(relabeled.shares_pixels_with(&image));
    assert_eq!(relabeled.coords(), moved.coords());
    assert_eq!(image.metadata().camera.as_deref(), Some("Synthetic"));

    let both = image.copy_with(Coords::default(), Metadata::default());
    assert!(both.shares_pixels_with(&image));
    assert!(both.coords().is_empty());
}

#[tokio::test]
async fn test_rgb_plane_component_access() {
    let source = SyntheticSource::new(4, 3).with_pixel_format(1, 3);
    let image = source
        .snap()
        .await
        .unwrap()
        .into_image(Coords::default())
        .unwrap();

    let red = image.raw_pixels_for_component(0).unwrap();
    let blue = image.raw_pixels_for_component(2).unwrap();
    assert_eq!(red.len(), 12);
    assert_eq!(blue.len(), 12);

    // De-interleaved samples agree with per-pixel lookups
    for y in 0..3u32 {
        for x in 0..4u32 {
            let i = (y * 4 + x) as usize;
            assert_eq!(u64::from(red[i]), image.component_intensity_at(x, y, 0).unwrap());
            assert_eq!(u64::from(blue[i]), image.component_intensity_at(x, y, 2).unwrap());
        }
    }

    let text = image.intensity_string_at(1, 1).unwrap();
    assert!(text.starts_with('[') && text.ends_with(']'));
    assert_eq!(text.matches('/').count(), 2);

    assert!(matches!(
        image.raw_pixels_for_component(3),
        Err(ImageError::InvalidComponent { .. })
    ));
}

#[tokio::test]
async fn test_sixteen_bit_plane_bounds() {
    let source = SyntheticSource::new(5, 2);
    let image = source
        .snap()
        .await
        .unwrap()
        .into_image(Coords::default())
        .unwrap();

    assert_eq!(image.bytes_per_pixel(), 2);
    assert!(image.intensity_at(4, 1).is_ok());
    assert_eq!(
        image.intensity_at(5, 0).unwrap_err(),
        ImageError::OutOfBounds {
            x: 5,
            y: 0,
            width: 5,
            height: 2
        }
    );
    assert!(image.intensity_string_at(0, 2).is_err());
    assert!(!image.intensity_string_at(0, 0).unwrap().starts_with('['));
}
