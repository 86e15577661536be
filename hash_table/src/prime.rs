/// Trial division up to `sqrt(n)`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }

    true
}

/// Smallest odd prime `>= n`. Even inputs are bumped to odd first, so `2` is never returned.
pub fn next_prime(n: usize) -> usize {
    let mut n = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(n) {
        n += 2;
    }
    n
}
