use crate::browser;
use anyhow::{anyhow, Context, Error, Result};
// wasm is single threaded, so Rc RefCell over Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref cast from Javascript type to Rust type
    // - we create the closures and pick their types ourselves
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// One discrete key press, `code` as in `KeyboardEvent.code`
    fn key_down(&mut self, code: &str);
    /// Advance the simulation by `dt` seconds
    fn update(&mut self, dt: f32);
    fn draw(&self, renderer: &Renderer);
}

// length of a frame in milliseconds
const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut keys = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            // input lands before the frame's first update
            for code in input::drain(&mut keys) {
                game.key_down(&code);
            }
            game_loop.accumulated_delta += (perf - game_loop.last_frame) as f32;
            while game_loop.accumulated_delta > FRAME_SIZE {
                game.update(FRAME_SIZE / 1000.0);
                game_loop.accumulated_delta -= FRAME_SIZE;
            }
            game_loop.last_frame = perf;
            game.draw(&renderer);
            if let Some(callback) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(callback) {
                    log!("GameLoop: {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// Axis aligned box covering [x, right) x [y, bottom)
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// Half-open overlap: boxes that only touch along an edge don't intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x() < other.right()
            && other.x() < self.right()
            && self.y() < other.bottom()
            && other.y() < self.bottom()
    }
}

/// Anything sprites can be drawn on, keyed by sprite id
pub trait Surface {
    fn draw_sprite(&self, sprite: &str, position: Point);
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    const FONT: &'static str = "45px Arial";
    const HUD_FONT: &'static str = "20px Arial";

    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn draw_image_at(&self, image: &HtmlImageElement, position: &Point) {
        if let Err(err) = self.context.draw_image_with_html_image_element(
            image,
            position.x.into(),
            position.y.into(),
        ) {
            log!("Drawing image failed : {:#?}", err);
        }
    }

    pub fn draw_hud(&self, text: &str, position: &Point) {
        self.context.save();
        self.context.set_font(Self::HUD_FONT);
        self.context.set_fill_style_str("black");
        if let Err(err) = self
            .context
            .fill_text(text, position.x.into(), position.y.into())
        {
            log!("Drawing HUD failed : {:#?}", err);
        }
        self.context.restore();
    }

    /// Game over screen, drawn on top of the last frame
    pub fn draw_game_over(&self, points: i32, levels_completed: usize) {
        let lines = [
            ("Game Over!".to_string(), Point::new(120.0, 200.0)),
            (format!("Final Score: {}", points), Point::new(100.0, 300.0)),
            (
                format!("Levels Completed: {}", levels_completed),
                Point::new(50.0, 400.0),
            ),
        ];
        self.context.save();
        self.context.set_fill_style_str("black");
        self.context.set_stroke_style_str("red");
        self.context.set_font(Self::FONT);
        for (text, at) in lines.iter() {
            let filled = self.context.fill_text(text, at.x.into(), at.y.into());
            let stroked = self.context.stroke_text(text, at.x.into(), at.y.into());
            if let Err(err) = filled.and(stroked) {
                log!("Drawing game over failed : {:#?}", err);
            }
        }
        self.context.restore();
    }
}

/// Sprite id -> loaded image. Everything is loaded up front, nothing lazily.
#[derive(Default)]
pub struct Resources {
    images: HashMap<String, HtmlImageElement>,
}

impl Resources {
    /// Loads every source in parallel, fails on the first image that errors
    pub async fn load(sources: &[String]) -> Result<Self> {
        let images = try_join_all(sources.iter().map(|source| async move {
            load_image(source)
                .await
                .with_context(|| format!("Failed to load sprite image from : {}", source))
                .map(|image| (source.clone(), image))
        }))
        .await?;

        Ok(Resources {
            images: images.into_iter().collect(),
        })
    }

    pub fn get(&self, sprite: &str) -> Option<&HtmlImageElement> {
        self.images.get(sprite)
    }
}

/// A renderer paired with the images it draws from
pub struct Canvas<'a> {
    pub renderer: &'a Renderer,
    pub resources: &'a Resources,
}

impl Surface for Canvas<'_> {
    fn draw_sprite(&self, sprite: &str, position: Point) {
        match self.resources.get(sprite) {
            Some(image) => self.renderer.draw_image_at(image, &position),
            None => log!("Missing sprite : {}", sprite),
        }
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // Result<Result<(), Error>, oneshot::Canceled>
    // - first ? : channel result
    // - second ? : image load result
    rx.await??;

    Ok(image)
}

pub mod input {
    use crate::browser;
    use anyhow::Result;
    use futures::channel::mpsc::{unbounded, UnboundedReceiver};
    use web_sys::KeyboardEvent;

    pub enum KeyPress {
        KeyDown(KeyboardEvent),
    }

    /// Queue every `keydown` on the document for the game loop to drain
    pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
        let (sender, receiver) = unbounded();
        let on_keydown = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
            // arrow keys would scroll the page
            event.prevent_default();
            let _ = sender.unbounded_send(KeyPress::KeyDown(event));
        }) as Box<dyn FnMut(KeyboardEvent)>);
        browser::on_keydown(on_keydown)?;
        Ok(receiver)
    }

    /// Key codes queued since the last call, oldest first
    pub fn drain(receiver: &mut UnboundedReceiver<KeyPress>) -> Vec<String> {
        let mut codes = Vec::new();
        while let Ok(Some(KeyPress::KeyDown(event))) = receiver.try_next() {
            codes.push(event.code());
        }
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(width, height))
    }

    #[test]
    fn edges() {
        let r = rect(10.0, 20.0, 30.0, 40.0);
        assert_relative_eq!(r.right(), 40.0);
        assert_relative_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn overlapping_rects_intersect_both_ways() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(9.0, 9.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let right = rect(10.0, 0.0, 10.0, 10.0);
        let below = rect(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!right.intersects(&a));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn contained_rect_intersects() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(40.0, 40.0, 5.0, 5.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_enough() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 50.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }
}
