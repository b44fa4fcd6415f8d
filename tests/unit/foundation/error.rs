use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LucentError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LucentError::unsupported("x")
            .to_string()
            .contains("unsupported format:")
    );
    assert!(
        LucentError::resource(GpuResource::Sampler, "x")
            .to_string()
            .contains("resource allocation failed (sampler)")
    );
    assert!(
        LucentError::conversion(ConversionStep::TextureToImage, "x")
            .to_string()
            .contains("conversion failed (texture to image)")
    );
}

#[test]
fn blur_codes_are_distinct_and_ordered() {
    let steps = [
        BlurStep::Background,
        BlurStep::Mask,
        BlurStep::MaskConversion,
        BlurStep::MaskRestretch,
        BlurStep::FilterConstruction,
        BlurStep::FilterOutput,
    ];
    for (expected, step) in steps.iter().enumerate() {
        assert_eq!(usize::from(step.code()), expected);
    }
}

#[test]
fn blur_error_reports_code() {
    let err = LucentError::blur(BlurStep::MaskRestretch, "stretch failed");
    assert_eq!(err.blur_code(), Some(3));
    assert!(err.to_string().contains("code 3"));
    assert_eq!(LucentError::validation("x").blur_code(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LucentError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
