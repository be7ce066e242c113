mod loading;
mod session;
mod title;

pub(crate) use title::TitleScreen;

const FADE_IN_SECONDS: f32 = 0.5;
const FADE_OUT_SECONDS: f32 = 0.35;
