use std::ops::Range;

use crate::renderer::batch::SpriteBatch;

/// One render pass worth of a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer
{
        /// `SpriteBatch::batches[range]`.
        Sprites(Range<usize>),

        /// Text run index.
        Text(usize),
}

/// Keeps sprites and text in the order they were drawn.
///
/// Sprites batch freely until text is drawn; the text then gets a run of its
/// own and later sprites start a new layer above it.
#[derive(Debug, Default)]
pub struct PaintOrder
{
        layers: Vec<Layer>,

        /// First batch not yet covered by a sprite layer.
        sprite_mark: usize,

        runs: usize,
}

impl PaintOrder
{
        pub fn new() -> Self
        {
                Self::default()
        }

        pub fn clear(&mut self)
        {
                self.layers.clear();
                self.sprite_mark = 0;
                self.runs = 0;
        }

        fn close_sprites(
                &mut self,
                batch: &SpriteBatch,
        )
        {
                let end = batch.batches.len();

                if end > self.sprite_mark
                {
                        self.layers.push(Layer::Sprites(self.sprite_mark..end));
                        self.sprite_mark = end;
                }
        }

        /// Returns the text run the next text belongs to. Consecutive text
        /// shares one run.
        pub fn text(
                &mut self,
                batch: &mut SpriteBatch,
        ) -> usize
        {
                self.close_sprites(batch);

                batch.seal();

                if let Some(Layer::Text(run)) = self.layers.last()
                {
                        return *run;
                }

                let run = self.runs;

                self.runs += 1;
                self.layers.push(Layer::Text(run));

                run
        }

        /// Every layer of the scene, bottom first.
        pub fn finish(
                &mut self,
                batch: &SpriteBatch,
        ) -> &[Layer]
        {
                self.close_sprites(batch);

                &self.layers
        }
}

#[cfg(test)]
mod tests
{
        use super::*;
        use crate::video::{Color, Rect};

        #[test]
        fn text_between_sprites_keeps_call_order()
        {
                let mut batch = SpriteBatch::new();
                let mut order = PaintOrder::new();

                let rect = Rect::new(0, 0, 10, 10);

                batch.push_rect(Color::WHITE, rect);

                assert_eq!(order.text(&mut batch), 0);
                assert_eq!(order.text(&mut batch), 0);

                // Same texture and filter, still not merged across the text.
                batch.push_rect(Color::WHITE, rect);
                batch.push_rect(Color::WHITE, rect);

                assert_eq!(
                        order.finish(&batch),
                        &[Layer::Sprites(0..1), Layer::Text(0), Layer::Sprites(1..2)]
                );
        }

        #[test]
        fn rectangle_after_captions_is_on_top()
        {
                let mut batch = SpriteBatch::new();
                let mut order = PaintOrder::new();

                let rect = Rect::new(0, 0, 10, 10);

                batch.push_rect(Color::WHITE, rect);
                order.text(&mut batch);
                batch.push_rect(Color::WHITE, rect);

                assert_eq!(order.text(&mut batch), 1);

                batch.push_rect(Color::new(100, 255, 255, 255), rect);

                let layers = order.finish(&batch).to_vec();

                assert_eq!(layers.last(), Some(&Layer::Sprites(2..3)));
                assert_eq!(
                        layers,
                        vec![
                                Layer::Sprites(0..1),
                                Layer::Text(0),
                                Layer::Sprites(1..2),
                                Layer::Text(1),
                                Layer::Sprites(2..3),
                        ]
                );
        }

        #[test]
        fn text_only_and_empty_scenes()
        {
                let mut batch = SpriteBatch::new();
                let mut order = PaintOrder::new();

                assert!(order.finish(&batch).is_empty());

                order.text(&mut batch);

                assert_eq!(order.finish(&batch), &[Layer::Text(0)]);

                order.clear();
                batch.clear();

                assert!(order.finish(&batch).is_empty());
        }
}
