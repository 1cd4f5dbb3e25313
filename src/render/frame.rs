/// One rendered frame as tightly packed RGBA8 bytes, physical-pixel sized.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Row-major pixels, `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha. The CPU renderer always
    /// produces premultiplied output.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixels in straight (non-premultiplied) alpha, for encoders that store
    /// unassociated color such as PNG. Rounds to nearest; a frame already in
    /// straight alpha is returned unchanged.
    pub fn straight_alpha_data(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let a = px[3];
                if a == 0 {
                    px[0] = 0;
                    px[1] = 0;
                    px[2] = 0;
                } else if a != 255 {
                    let a16 = u16::from(a);
                    for c in &mut px[..3] {
                        *c = ((u16::from(*c) * 255 + a16 / 2) / a16).min(255) as u8;
                    }
                }
            }
        }
        data
    }
}
