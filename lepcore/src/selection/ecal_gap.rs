/// Supercluster |eta| below which a candidate is in the ECAL barrel.
pub const BARREL_ETA_MAX: f32 = 1.4442;
/// Supercluster |eta| above which a candidate is in the ECAL endcap.
pub const ENDCAP_ETA_MIN: f32 = 1.566;

/// True unless the supercluster eta falls in the barrel/endcap transition region.
pub fn outside_ecal_gap(eta: f32, delta_eta_sc: f32) -> bool {
    let sc_eta = (eta + delta_eta_sc).abs();
    sc_eta < BARREL_ETA_MAX || sc_eta > ENDCAP_ETA_MIN
}

/// Keep-mask vetoing candidates in the ECAL barrel/endcap gap.
///
/// # Example
///
/// ```rust
/// # use lepcore::selection::ecal_gap::ecal_gap;
/// let mask = ecal_gap(&[1.4, 1.5, -1.6], &[0.0, 0.0, 0.0]);
/// assert_eq!(mask, vec![true, false, true]);
/// ```
pub fn ecal_gap(eta: &[f32], delta_eta_sc: &[f32]) -> Vec<bool> {
    debug_assert_eq!(eta.len(), delta_eta_sc.len(), "eta and deltaEtaSC must be aligned");
    eta.iter()
        .zip(delta_eta_sc.iter())
        .map(|(&eta, &delta)| outside_ecal_gap(eta, delta))
        .collect()
}
