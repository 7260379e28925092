pub mod ffmpeg_audio_reader;
pub mod ffmpeg_transcoder;
pub mod text_file_writer;
