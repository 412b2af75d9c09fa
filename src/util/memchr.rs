/*!
A wrapper around the single byte search from the `memchr` crate. When the
`perf-literal` feature is enabled we use the real implementation, and
otherwise a naive but dependency-free fallback with the same contract.
*/

#[cfg(feature = "perf-literal")]
#[inline(always)]
pub(crate) fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    memchr::memchr(needle, haystack)
}

#[cfg(not(feature = "perf-literal"))]
#[inline(always)]
pub(crate) fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}
