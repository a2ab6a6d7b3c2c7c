#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
pub mod io;

pub mod model {
    pub use motif_model::*;
}

pub mod engine {
    pub use motif_engine::*;
}

pub mod corpus {
    pub use motif_corpus::*;
}

pub mod similarity {
    pub use motif_similarity::*;
}
