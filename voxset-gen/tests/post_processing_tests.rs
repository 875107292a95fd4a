//! Post-processing integration tests
//!
//! Exercise the offline passes (augment, halves, sort) end to end over real
//! WAV files in temp trees.

use std::path::Path;
use tempfile::TempDir;
use voxset_common::audio::wav;
use voxset_common::KeywordTable;
use voxset_gen::augment::{augment_tree, AugmentConfig};
use voxset_gen::halves;
use voxset_gen::sort;

fn write_tone(path: &Path, secs: f64, amplitude: f32, rate: u32) {
    let count = (secs * rate as f64) as usize;
    let samples: Vec<f32> = (0..count)
        .map(|i| amplitude * (2.0 * std::f32::consts::PI * 330.0 * i as f32 / rate as f32).sin())
        .collect();
    wav::write_wav_mono16(path, &samples, rate).unwrap();
}

#[test]
fn augment_produces_fixed_duration_variants() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let noise = temp_dir.path().join("noise");
    let out = temp_dir.path().join("out");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::create_dir_all(&noise).unwrap();

    write_tone(&data.join("HeyMemo_var1.wav"), 0.8, 0.4, 16000);
    write_tone(&noise.join("street.wav"), 2.0, 0.2, 16000);

    let config = AugmentConfig {
        count: 4,
        ..Default::default()
    };
    let processed = augment_tree(&data, &out, &noise, &config).unwrap();
    assert_eq!(processed, 1);

    let variants: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(variants.len(), 4);

    for variant in variants {
        let name = variant.file_name().to_string_lossy().to_string();
        assert!(name.starts_with("HeyMemo_var1_padded_snr"), "{name}");

        let (samples, rate) = wav::read_wav_mono(&variant.path()).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(samples.len(), (1.6 * 16000.0) as usize, "{name}");

        // Noise must actually be mixed in: the padding region is non-silent
        let head_energy: f32 = samples[..800].iter().map(|&s| s * s).sum();
        assert!(head_energy > 0.0, "{name} padding is pure silence");
    }
}

#[test]
fn augment_without_noise_dir_is_a_noop() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let noise = temp_dir.path().join("noise");
    let out = temp_dir.path().join("out");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::create_dir_all(&noise).unwrap();

    write_tone(&data.join("clip.wav"), 0.5, 0.4, 16000);

    let processed = augment_tree(&data, &out, &noise, &AugmentConfig::default()).unwrap();
    assert_eq!(processed, 0);
}

#[test]
fn halves_then_sort_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("generated/TakeAPicture_set");
    let halved = temp_dir.path().join("halved");
    let sorted = temp_dir.path().join("sorted");
    std::fs::create_dir_all(&source).unwrap();

    // 0.9 s of speech bracketed by silence
    let mut samples = vec![0.0f32; 3200];
    samples.extend(
        (0..14400)
            .map(|i| 0.4 * (2.0 * std::f32::consts::PI * 330.0 * i as f32 / 16000.0).sin()),
    );
    samples.extend(vec![0.0f32; 3200]);
    wav::write_wav_mono16(&source.join("TakeAPicture_var3.wav"), &samples, 16000).unwrap();

    let processed =
        halves::process_tree(&temp_dir.path().join("generated"), &halved, 1.6, 16000).unwrap();
    assert_eq!(processed, 1);

    let half1 = halved.join("TakeAPicture_set/half1_TakeAPicture_var3.wav");
    let half2 = halved.join("TakeAPicture_set/half2_TakeAPicture_var3.wav");
    assert!(half1.exists());
    assert!(half2.exists());

    // The halves keep the keyword in their names, so sorting files them
    let summary = sort::sort_tree(&halved, &sorted, &KeywordTable::default(), true).unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.matched, 2);
    assert!(sorted
        .join("TakeAPicture/half1_TakeAPicture_var3.wav")
        .exists());
    assert!(sorted
        .join("TakeAPicture/half2_TakeAPicture_var3.wav")
        .exists());
}
