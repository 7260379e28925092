use std::path::Path;

use crate::media::domain::audio_transcoder::AudioTranscoder;
use crate::shared::constants::MP3_BITRATE;

/// Sample rates the MP3 encoder accepts.
const MP3_SAMPLE_RATES: &[u32] = &[
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000,
];

/// Extracts the audio stream of a media file into an MP3 using ffmpeg-next.
///
/// The source audio is decoded to mono f32, resampled to an MP3-legal rate
/// when necessary, and re-encoded at a fixed bitrate. An existing file at
/// the output path is overwritten.
pub struct FfmpegTranscoder;

impl AudioTranscoder for FfmpegTranscoder {
    fn extract(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let (samples, rate) = decode_mono(input)?;
        encode_mp3(&samples, rate, output)
    }
}

/// Decode the best audio stream to mono f32 at an MP3-legal sample rate.
fn decode_mono(input: &Path) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut ictx = ffmpeg_next::format::input(input)?;

    let audio_stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .ok_or_else(|| format!("no audio stream in {}", input.display()))?;

    let audio_stream_index = audio_stream.index();
    let codec_ctx =
        ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())?;
    let mut decoder = codec_ctx.decoder().audio()?;

    let target_rate = nearest_mp3_rate(decoder.rate());
    let mut resampler = ffmpeg_next::software::resampling::Context::get(
        decoder.format(),
        decoder.channel_layout(),
        decoder.rate(),
        ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
        ffmpeg_next::ChannelLayout::MONO,
        target_rate,
    )?;

    let mut samples: Vec<f32> = Vec::new();
    let mut decoded_frame = ffmpeg_next::util::frame::audio::Audio::empty();
    let mut resampled_frame = ffmpeg_next::util::frame::audio::Audio::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() != audio_stream_index {
            continue;
        }

        decoder.send_packet(&packet)?;

        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler.run(&decoded_frame, &mut resampled_frame)?;
            collect_samples(&resampled_frame, &mut samples);
        }
    }

    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded_frame).is_ok() {
        resampler.run(&decoded_frame, &mut resampled_frame)?;
        collect_samples(&resampled_frame, &mut samples);
    }

    if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
        if delay.output > 0 {
            collect_samples(&resampled_frame, &mut samples);
        }
    }

    Ok((samples, target_rate))
}

/// Encode mono f32 samples as MP3 at a fixed bitrate.
fn encode_mp3(
    samples: &[f32],
    rate: u32,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut octx = ffmpeg_next::format::output(output)?;

    let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MP3)
        .ok_or("MP3 encoder not found")?;
    let mut ost = octx.add_stream(Some(codec))?;
    let stream_index = ost.index();

    let mut encoder = ffmpeg_next::codec::context::Context::new_with_codec(codec)
        .encoder()
        .audio()?;
    encoder.set_rate(rate as i32);
    encoder.set_channel_layout(ffmpeg_next::ChannelLayout::MONO);
    encoder.set_format(ffmpeg_next::format::Sample::F32(
        ffmpeg_next::format::sample::Type::Planar,
    ));
    encoder.set_bit_rate(MP3_BITRATE);

    let mut encoder = encoder.open_as(codec)?;
    ost.set_parameters(&encoder);

    let enc_time_base = encoder.time_base();

    octx.write_header()?;
    let ost_time_base = octx
        .stream(stream_index)
        .ok_or("missing output stream")?
        .time_base();

    let frame_size = match encoder.frame_size() as usize {
        0 => 1152,
        n => n,
    };

    let mut pts: i64 = 0;
    for chunk in samples.chunks(frame_size) {
        let mut frame = ffmpeg_next::util::frame::audio::Audio::new(
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
            chunk.len(),
            ffmpeg_next::ChannelLayout::MONO,
        );
        frame.set_rate(rate);
        frame.set_pts(Some(pts));

        // Copy f32 samples into the frame's data plane
        let dst = frame.data_mut(0);
        let src_bytes =
            unsafe { std::slice::from_raw_parts(chunk.as_ptr() as *const u8, chunk.len() * 4) };
        dst[..src_bytes.len()].copy_from_slice(src_bytes);

        encoder.send_frame(&frame)?;
        drain_packets(&mut encoder, &mut octx, stream_index, enc_time_base, ost_time_base)?;

        pts += chunk.len() as i64;
    }

    encoder.send_eof()?;
    drain_packets(&mut encoder, &mut octx, stream_index, enc_time_base, ost_time_base)?;

    octx.write_trailer()?;
    Ok(())
}

fn drain_packets(
    encoder: &mut ffmpeg_next::codec::encoder::audio::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    stream_index: usize,
    enc_time_base: ffmpeg_next::Rational,
    ost_time_base: ffmpeg_next::Rational,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(stream_index);
        encoded.rescale_ts(enc_time_base, ost_time_base);
        encoded.write_interleaved(octx)?;
    }
    Ok(())
}

/// The encoder rate: the source rate when MP3 supports it, 44.1 kHz otherwise.
fn nearest_mp3_rate(source_rate: u32) -> u32 {
    if MP3_SAMPLE_RATES.contains(&source_rate) {
        source_rate
    } else {
        44100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nonexistent_input() {
        let transcoder = FfmpegTranscoder;
        let input = if cfg!(windows) {
            Path::new("Z:\\nonexistent\\clip.mp4")
        } else {
            Path::new("/nonexistent/clip.mp4")
        };
        let result = transcoder.extract(input, Path::new("out.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn test_supported_rates_pass_through() {
        assert_eq!(nearest_mp3_rate(44100), 44100);
        assert_eq!(nearest_mp3_rate(48000), 48000);
        assert_eq!(nearest_mp3_rate(16000), 16000);
    }

    #[test]
    fn test_unsupported_rates_fall_back() {
        assert_eq!(nearest_mp3_rate(96000), 44100);
        assert_eq!(nearest_mp3_rate(7999), 44100);
    }
}
