mod autoencoder_test;
mod kronecker_test;
mod sampler_test;
