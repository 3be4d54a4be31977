// selection module
pub mod selection {
    pub mod vid;
    pub mod isolation;
    pub mod ecal_gap;
}

// merge module
pub mod merge {
    pub mod provenance;
    pub mod ordered;
    pub mod overlap;
    pub mod gather;
}

// algorithm module
pub mod algorithm {
    pub mod utility;
}

pub mod error;
