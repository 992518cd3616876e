pub mod gazetteer;
pub mod reconcile;
pub mod spans;
pub mod stanford;
pub mod tagger;

pub use gazetteer::GazetteerTagger;
pub use reconcile::reconcile;
pub use spans::{extract_spans, EntityIndex, EntitySpan};
pub use stanford::StanfordTagger;
pub use tagger::NamedEntityTagger;
