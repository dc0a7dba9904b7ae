mod common;

use common::synthetic_image::{noise_u8, ramp_u8, test_images};
use pixfoundry::{
    Backend, BorderMode, BufferInfo, Channels, Error, FilterOptions, Image, ImageView, SampleType, crop,
    flip_horizontal, flip_vertical, mean_filter, require_contiguous, sepia, zerocopy_roundtrip,
};

#[test]
fn crop_reproduces_ramp_corners() {
    let img = ramp_u8(6, 5);
    let out = crop(&img.as_view(), 1, 2, 3, 2, Backend::Auto).expect("crop");
    assert_eq!(out.data(), &[12, 13, 22, 23, 32, 33]);
    assert_eq!(
        crop(&img.as_view(), 4, 0, 2, 1, Backend::Auto),
        Err(Error::OutOfBounds)
    );
}

#[test]
fn double_flip_is_identity_on_noise() {
    for img in test_images() {
        let view = img.as_view();
        let h = flip_horizontal(&view, Backend::Auto).expect("flip");
        assert_ne!(h, img);
        assert_eq!(flip_horizontal(&h.as_view(), Backend::Auto).expect("flip"), img);

        let v = flip_vertical(&view, Backend::Auto).expect("flip");
        assert_eq!(flip_vertical(&v.as_view(), Backend::Auto).expect("flip"), img);
    }
}

#[test]
fn constant_border_mean_on_single_pixel() {
    let img = Image::new_fill(1, 1, Channels::Gray, 0u8);
    for c in [0u8, 1, 9, 100, 128, 200, 255] {
        let opts = FilterOptions::new(BorderMode::Constant(c), Backend::Auto);
        let out = mean_filter(&img.as_view(), 3, &opts).expect("mean");
        let expected = (8.0 * f64::from(c) / 9.0).round() as u8;
        assert_eq!(out.data(), &[expected]);
    }
}

#[test]
fn zero_copy_view_aliases_caller_memory() {
    let img = noise_u8(17, 9, Channels::Rgb, 3);
    let info = img.buffer_info().expect("shape fits");
    let view = zerocopy_roundtrip(&info).expect("contiguous");
    assert_eq!(view.as_ptr(), img.data().as_ptr());
    assert_eq!((view.width(), view.height(), view.channels()), (17, 9, Channels::Rgb));
}

#[test]
fn strided_buffers_are_rejected_not_copied() {
    let data = vec![0u8; 10 * 6 * 3];
    let padded = ImageView::from_slice(5, 10, Channels::Rgb, 18, &data).expect("padded view");
    assert!(matches!(
        require_contiguous(&padded),
        Err(Error::InvalidBuffer { .. })
    ));

    let info = BufferInfo {
        data: &data,
        sample_type: SampleType::U8,
        shape: vec![10, 5, 3],
        strides: vec![30, 6, 1],
    };
    assert!(matches!(
        ImageView::from_buffer(&info),
        Err(Error::InvalidBuffer { .. })
    ));
}

#[test]
fn sepia_rejects_gray_before_backend_selection() {
    let [gray, rgb] = test_images();
    for backend in [Backend::Single, Backend::Parallel, Backend::Auto] {
        assert!(matches!(
            sepia(&gray.as_view(), backend),
            Err(Error::UnsupportedChannelLayout { .. })
        ));
    }
    assert!(sepia(&rgb.as_view(), Backend::Single).is_ok());
}
