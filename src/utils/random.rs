/// Uniform-ish index into a collection of `len` items, from OS entropy.
pub fn random_index(len: usize) -> anyhow::Result<usize>
{
        if len == 0
        {
                anyhow::bail!("Cannot pick from an empty collection.");
        }

        let mut buf = [0u8; 8];

        getrandom::fill(&mut buf).map_err(|e| anyhow::anyhow!("No entropy available: {e}"))?;

        Ok((u64::from_ne_bytes(buf) % len as u64) as usize)
}
