use gridcaster::renderer::pack_rgb;

/// CPU-side wall texture, 0RGB pixels, row-major.
struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<u32>,
}

impl Pixmap {
    fn from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> u32) -> Self {
        let mut px = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                px.push(f(x, y));
            }
        }
        Self { w, h, px }
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> u32 {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[yi * self.w as usize + xi]
    }
}

/// Procedural wall textures, one per variant, all the same size.
pub struct WallTextures {
    width: u32,
    height: u32,
    maps: Vec<Pixmap>,
}

impl WallTextures {
    pub fn generate(width: u32, height: u32) -> Self {
        let maps = vec![
            make_brick(width, height),
            make_checker(width, height, (90, 90, 200)),
            make_stripes(width, height, (200, 90, 90)),
            make_stone(width, height),
        ];
        tracing::debug!(width, height, count = maps.len(), "wall textures ready");
        Self {
            width,
            height,
            maps,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel for wall `variant` at column `tx`, row `ty`. Variants past the
    /// generated set wrap around.
    #[inline]
    pub fn sample(&self, variant: u8, tx: u32, ty: u32) -> u32 {
        let i = (variant.max(1) as usize - 1) % self.maps.len();
        self.maps[i].sample(tx, ty)
    }
}

// grayscale brightness shift, saturating
#[inline]
fn shade(rgb: (u8, u8, u8), delta: i16) -> u32 {
    let f = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
    pack_rgb(f(rgb.0), f(rgb.1), f(rgb.2))
}

fn make_brick(w: u32, h: u32) -> Pixmap {
    let brick = (150, 70, 50);
    let mortar = (190, 190, 180);
    let row_h = (h / 8).max(2);
    let brick_w = (w / 4).max(2);
    Pixmap::from_fn(w, h, |x, y| {
        let row = y / row_h;
        let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
        if y % row_h == 0 || (x + offset) % brick_w == 0 {
            shade(mortar, 0)
        } else {
            shade(brick, ((x * 7 + y * 13) % 17) as i16 - 8)
        }
    })
}

fn make_checker(w: u32, h: u32, base: (u8, u8, u8)) -> Pixmap {
    let cell = (w / 8).max(1);
    Pixmap::from_fn(w, h, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            shade(base, 40)
        } else {
            shade(base, -20)
        }
    })
}

fn make_stripes(w: u32, h: u32, base: (u8, u8, u8)) -> Pixmap {
    let band = (w / 8).max(1);
    Pixmap::from_fn(w, h, |x, _| {
        if (x / band) % 2 == 0 {
            shade(base, 30)
        } else {
            shade(base, -30)
        }
    })
}

fn make_stone(w: u32, h: u32) -> Pixmap {
    let base = (120, 120, 110);
    Pixmap::from_fn(w, h, |x, y| {
        // cheap integer hash for speckle
        let n = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
        shade(base, (n % 41) as i16 - 20)
    })
}
