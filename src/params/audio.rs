//! Audio decoding constants.

/// Audio constants (compile-time, shared by the decoder and the exporter)
pub mod audio_constants {
    /// File extensions handed to the symphonia probe as a hint.
    /// WAV is decoded separately through hound.
    pub const SUPPORTED_EXTENSIONS: [&str; 8] =
        ["wav", "mp3", "flac", "ogg", "oga", "aac", "m4a", "mp4"];

    /// Bit depth of the exported mono track (audio.wav)
    pub const EXPORT_BITS_PER_SAMPLE: u16 = 16;

    /// Full-scale value for integer PCM of the given bit depth.
    ///
    /// 16-bit => 2^15, 32-bit => 2^31. Dividing a sample by this maps it into [-1, 1].
    pub fn full_scale(bits_per_sample: u16) -> f32 {
        let bits = bits_per_sample.clamp(1, 32) as i32;
        2f32.powi(bits - 1)
    }

}
