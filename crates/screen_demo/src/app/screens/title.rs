use screen_engine::{
    Align, Control, Controller, DrawingContext, FadeToBlack, Screen, ScreenContext, ScreenError,
    Vec2, LAYER_BACKGROUND, LAYER_GUI, LINE_HEIGHT,
};
use tracing::info;

use super::loading::LoadingScreen;
use super::{FADE_IN_SECONDS, FADE_OUT_SECONDS};

const BACKGROUND: [u8; 4] = [18, 22, 34, 255];
const TITLE_COLOR: [u8; 4] = [255, 210, 70, 255];
const ITEM_COLOR: [u8; 4] = [176, 198, 220, 255];
const SELECTED_COLOR: [u8; 4] = [244, 248, 252, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuItem {
    Start,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 2] = [MenuItem::Start, MenuItem::Quit];

    fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "START",
            MenuItem::Quit => "QUIT",
        }
    }
}

/// Wrapping cursor over the title menu.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TitleMenu {
    selected: usize,
}

impl TitleMenu {
    pub(crate) fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    /// Applies one step of controller edges; returns the item activated, if any.
    pub(crate) fn handle(&mut self, controller: &Controller) -> Option<MenuItem> {
        let count = MenuItem::ALL.len();
        if controller.pressed(Control::Up) {
            self.selected = (self.selected + count - 1) % count;
        }
        if controller.pressed(Control::Down) {
            self.selected = (self.selected + 1) % count;
        }
        if controller.pressed(Control::Escape) || controller.pressed(Control::MenuBack) {
            return Some(MenuItem::Quit);
        }
        if controller.pressed(Control::MenuSelect) || controller.pressed(Control::Jump) {
            return Some(self.selected());
        }
        None
    }
}

#[derive(Debug, Default)]
pub(crate) struct TitleScreen {
    menu: TitleMenu,
}

impl TitleScreen {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Screen for TitleScreen {
    fn setup(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        ctx.set_screen_fade(Some(FadeToBlack::fade_in(FADE_IN_SECONDS)));
        Ok(())
    }

    fn leave(&mut self) -> Result<(), ScreenError> {
        Ok(())
    }

    fn update(
        &mut self,
        _dt_seconds: f32,
        controller: &Controller,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<(), ScreenError> {
        // A transition is already on its way.
        if ctx.pending_actions() > 0 {
            return Ok(());
        }
        match self.menu.handle(controller) {
            Some(MenuItem::Start) => {
                info!("title_start_selected");
                ctx.push_screen(
                    Box::new(LoadingScreen::new()),
                    Some(FadeToBlack::fade_out(FADE_OUT_SECONDS)),
                );
            }
            Some(MenuItem::Quit) => {
                info!("title_quit_selected");
                ctx.quit(Some(FadeToBlack::fade_out(FADE_OUT_SECONDS)));
            }
            None => {}
        }
        Ok(())
    }

    fn draw(&mut self, context: &mut DrawingContext) -> Result<(), ScreenError> {
        let center_x = context.width() as f32 / 2.0;
        let top = context.height() as f32 / 3.0;
        context.fill_screen(BACKGROUND, LAYER_BACKGROUND);
        context.draw_text(
            "SCREEN ENGINE DEMO",
            Vec2::new(center_x, top),
            Align::Center,
            TITLE_COLOR,
            LAYER_GUI,
        );

        let line_step = LINE_HEIGHT as f32 * 2.0;
        for (index, item) in MenuItem::ALL.iter().enumerate() {
            let selected = *item == self.menu.selected();
            let label = if selected {
                format!("> {} <", item.label())
            } else {
                item.label().to_string()
            };
            context.draw_text(
                label,
                Vec2::new(center_x, top + line_step * (index as f32 + 2.0)),
                Align::Center,
                if selected { SELECTED_COLOR } else { ITEM_COLOR },
                LAYER_GUI,
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "title"
    }
}

#[cfg(test)]
mod tests {
    use screen_engine::DrawCommand;

    use super::*;

    fn press(control: Control) -> Controller {
        let mut controller = Controller::default();
        controller.set_control(control, true);
        controller
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut menu = TitleMenu::default();
        assert_eq!(menu.selected(), MenuItem::Start);

        assert_eq!(menu.handle(&press(Control::Up)), None);
        assert_eq!(menu.selected(), MenuItem::Quit);

        assert_eq!(menu.handle(&press(Control::Down)), None);
        assert_eq!(menu.selected(), MenuItem::Start);
    }

    #[test]
    fn select_activates_current_item() {
        let mut menu = TitleMenu::default();
        assert_eq!(menu.handle(&press(Control::MenuSelect)), Some(MenuItem::Start));

        menu.handle(&press(Control::Down));
        assert_eq!(menu.handle(&press(Control::Jump)), Some(MenuItem::Quit));
    }

    #[test]
    fn back_always_quits() {
        let mut menu = TitleMenu::default();
        assert_eq!(menu.handle(&press(Control::Escape)), Some(MenuItem::Quit));
        assert_eq!(menu.handle(&press(Control::MenuBack)), Some(MenuItem::Quit));
    }

    #[test]
    fn draw_highlights_selected_item() {
        let mut screen = TitleScreen::new();
        let mut context = DrawingContext::new(640, 480);

        screen.draw(&mut context).expect("draw");

        let texts: Vec<&str> = context
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"> START <"));
        assert!(texts.contains(&"QUIT"));
    }
}
