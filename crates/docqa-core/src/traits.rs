/// A text encoder producing L2-normalized vectors of a fixed dimension.
///
/// Implementations encode the texts exactly as given; any model-specific
/// input convention (such as query/passage prefixes) is applied by the caller.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
