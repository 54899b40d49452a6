use log::{debug, info, warn};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioSegment;
use crate::error::{Result, TaggerError};

/// Load an audio file as mono `f32` samples at its native sample rate.
///
/// WAV files are read with `hound`; every other container goes through
/// `symphonia`'s probe. Multi-channel audio is averaged down to mono.
pub fn load_audio_file<P: AsRef<Path>>(path: P) -> Result<AudioSegment> {
    let path = path.as_ref();
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("wav"));

    let segment = if is_wav {
        load_wav(path)?
    } else {
        load_with_symphonia(path)?
    };

    if segment.sample_rate == 0 {
        return Err(TaggerError::UnsupportedAudio(format!(
            "{} reports a sample rate of 0",
            path.display()
        )));
    }

    if segment.is_empty() {
        warn!("{} decoded to no samples; every timed word will be out of range", path.display());
    }

    info!(
        "Loaded audio file: {:?} ({}Hz, {} samples, {:.2}s)",
        path,
        segment.sample_rate,
        segment.len(),
        segment.duration_seconds()
    );
    Ok(segment)
}

fn load_wav(path: &Path) -> Result<AudioSegment> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    debug!("WAV spec: {:?}", spec);

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()?
        }
    };

    Ok(AudioSegment::new(
        mix_to_mono(&interleaved, spec.channels as usize),
        spec.sample_rate,
    ))
}

fn load_with_symphonia(path: &Path) -> Result<AudioSegment> {
    let src = File::open(path).map_err(|e| TaggerError::io("opening audio file", e))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| TaggerError::UnsupportedAudio("no audio track found".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1);

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                let spec = *audio_buf.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();

                let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(audio_buf);
                interleaved.extend_from_slice(sample_buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(AudioSegment::new(mix_to_mono(&interleaved, channels), sample_rate))
}

fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
        .collect()
}
