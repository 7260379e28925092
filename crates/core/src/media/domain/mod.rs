pub mod audio_reader;
pub mod audio_transcoder;
pub mod transcript_writer;
